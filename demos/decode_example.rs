//! 小さな辞書で 3 語の暗号文を解読する。

use monoalpha_solver::*;

fn main() {
    let dictionary = Dictionary::parse(
        "the\nand\ncat\nact\nsat\nmat\nhat\non\nno\nat\nto\nit\nis\nin\na\ni\n",
    );

    // 平文 "the cat sat" の各文字を 16 文字ずらして大文字にしたもの。
    let cipher_words = ["JXU", "SQJ", "IQJ"];

    let solutions = Solver::default().solve(&cipher_words, &dictionary).unwrap();
    println!("{}", solutions.report());

    // 解は換字表でも受け取れる。
    for solution in &solutions {
        println!("{}", solution.mapping().display());
    }
}
