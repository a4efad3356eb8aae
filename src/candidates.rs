use std::rc::Rc;

use itertools::Itertools as _;
use log::debug;

use crate::dictionary::Dictionary;

/// 語の形状。長さ(文字数)と異なり文字数の組。
///
/// 候補の絞り込みに使う必要条件であり、重複文字の位置までは見ない。
/// (例えば "ABAB" と "XYYX" は同じ形状を持つ)
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Shape {
    len: usize,
    diversity: usize,
}

impl Shape {
    /// 語の形状を求める。
    pub fn of(word: &str) -> Self {
        Self {
            len: word.chars().count(),
            diversity: diversity(word),
        }
    }

    /// 文字数を返す。
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(self) -> usize {
        self.len
    }

    /// 異なり文字数を返す。
    pub const fn diversity(self) -> usize {
        self.diversity
    }
}

/// 語に含まれる異なる文字の個数を返す。
pub fn diversity(word: &str) -> usize {
    word.chars().unique().count()
}

/// 暗号語 1 つ分の探索変数。暗号語と、その候補となる辞書語のリスト。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Variable {
    position: usize,
    cipher: Rc<str>,
    candidates: Vec<Rc<str>>,
}

impl Variable {
    /// 入力列における暗号語の位置を返す。
    pub fn position(&self) -> usize {
        self.position
    }

    /// 暗号語を返す。
    pub fn cipher(&self) -> &str {
        &self.cipher
    }

    /// 候補となる辞書語を辞書の順序で返す。
    pub fn candidates(&self) -> impl Iterator<Item = &str> + ExactSizeIterator + '_ {
        self.candidates.iter().map(AsRef::as_ref)
    }

    /// 候補数を返す。
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub(crate) fn cipher_entry(&self) -> &Rc<str> {
        &self.cipher
    }

    pub(crate) fn candidate_entries(&self) -> &[Rc<str>] {
        &self.candidates
    }
}

/// 各暗号語について、形状の一致する辞書語を候補として集める。
///
/// 戻り値は入力と同じ順序で、暗号語ごとに 1 つの `Variable` を含む。
pub fn index_candidates<S: AsRef<str>>(
    cipher_words: &[S],
    dictionary: &Dictionary,
) -> Vec<Variable> {
    // 辞書語の形状は暗号語ごとに求め直さない。
    let shapes: Vec<Shape> = dictionary.iter().map(Shape::of).collect();

    let variables: Vec<Variable> = cipher_words
        .iter()
        .enumerate()
        .map(|(position, cipher)| {
            let cipher = cipher.as_ref();
            let shape = Shape::of(cipher);
            let candidates = dictionary
                .entries()
                .iter()
                .zip(&shapes)
                .filter(|(_, &s)| s == shape)
                .map(|(word, _)| Rc::clone(word))
                .collect();

            Variable {
                position,
                cipher: Rc::from(cipher),
                candidates,
            }
        })
        .collect();

    debug!(
        "indexed {} cipher words against {} dictionary words",
        variables.len(),
        dictionary.len()
    );

    variables
}

/// 候補数の昇順に変数を並べ替える(MRV ヒューリスティック)。候補数が等しい変数は元の順序を保つ。
pub fn order_by_remaining(variables: &mut [Variable]) {
    variables.sort_by_key(Variable::candidate_count);

    debug!(
        "search order: {}",
        variables
            .iter()
            .map(|v| format!("{}({})", v.cipher(), v.candidate_count()))
            .join(" ")
    );
}
