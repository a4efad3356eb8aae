use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

/// 暗号文字から平文文字への部分単射(換字表)。
///
/// 一度割り当てた暗号文字の像は上書きされない。拡張は常に新しい値を返し、元の換字表は変化しない。
/// 束縛は暗号文字の昇順に保持されるので、`Hash` や `Eq` は束縛の追加順序に依存しない。
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Mapping {
    images: BTreeMap<char, char>,
    // 値域。`images` から導出できるが、単射性の判定のために別途持つ。
    used: BTreeSet<char>,
}

impl Mapping {
    /// 像を持たない暗号文字に対して `apply()` が出力する文字。
    pub const PLACEHOLDER: char = '?';

    /// 空の換字表を作る。
    pub fn new() -> Self {
        Self::default()
    }

    /// 暗号文字 `c` の像を返す。未割り当てなら `None` を返す。
    pub fn get(&self, c: char) -> Option<char> {
        self.images.get(&c).copied()
    }

    /// 平文文字 `p` が既にいずれかの暗号文字の像になっているかどうかを返す。
    pub fn is_used(&self, p: char) -> bool {
        self.used.contains(&p)
    }

    /// 束縛の個数を返す。
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// 束縛 `(暗号文字, 平文文字)` を暗号文字の昇順で返す。
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (char, char)> + DoubleEndedIterator + ExactSizeIterator + '_ {
        self.images.iter().map(|(&c, &p)| (c, p))
    }

    /// 暗号語 `cipher` と候補語 `candidate` を位置ごとに対応させた束縛を加えた換字表を返す。
    ///
    /// 既存の束縛と矛盾する場合、単射性が崩れる場合、長さが異なる場合は `None` を返す。
    pub fn extended(&self, cipher: &str, candidate: &str) -> Option<Self> {
        let mut res = self.clone();

        let mut cs = cipher.chars();
        let mut ps = candidate.chars();
        loop {
            match (cs.next(), ps.next()) {
                (Some(c), Some(p)) => {
                    if !res.bind(c, p) {
                        return None;
                    }
                }
                (None, None) => break,
                _ => return None,
            }
        }

        Some(res)
    }

    /// 束縛 `c -> p` を加える。矛盾するなら何もせず `false` を返す。
    fn bind(&mut self, c: char, p: char) -> bool {
        match self.images.get(&c) {
            Some(&image) => image == p,
            None => {
                if !self.used.insert(p) {
                    return false;
                }
                self.images.insert(c, p);
                true
            }
        }
    }

    /// 暗号語を換字表で平文に変換する。像を持たない文字は `Mapping::PLACEHOLDER` になる。
    pub fn apply(&self, cipher: &str) -> String {
        self.apply_with(cipher, Self::PLACEHOLDER)
    }

    /// 暗号語を換字表で平文に変換する。像を持たない文字は `placeholder` になる。
    pub fn apply_with(&self, cipher: &str, placeholder: char) -> String {
        cipher
            .chars()
            .map(|c| self.get(c).unwrap_or(placeholder))
            .collect()
    }

    /// 換字表を `{A: t, B: o}` の形式でフォーマットする `Display` オブジェクトを返す。
    pub fn display(&self) -> MappingDisplay {
        MappingDisplay { mapping: self }
    }
}

#[derive(Debug)]
pub struct MappingDisplay<'a> {
    mapping: &'a Mapping,
}

impl std::fmt::Display for MappingDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char('{')?;
        for (i, (c, p)) in self.mapping.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{c}: {p}")?;
        }
        f.write_char('}')
    }
}
