use itertools::Itertools as _;

use crate::mapping::Mapping;

/// 全ての暗号語を辞書語へ写す換字表 1 つと、それによる解読結果。
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Solution {
    mapping: Mapping,
    decrypted: Vec<String>,
}

impl Solution {
    pub(crate) fn new<S: AsRef<str>>(mapping: Mapping, cipher_words: &[S]) -> Self {
        let decrypted = cipher_words
            .iter()
            .map(|word| mapping.apply(word.as_ref()))
            .collect();

        Self { mapping, decrypted }
    }

    /// 換字表を返す。
    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// 束縛 `(暗号文字, 平文文字)` を暗号文字の昇順で返す。
    pub fn bindings(&self) -> impl Iterator<Item = (char, char)> + ExactSizeIterator + '_ {
        self.mapping.iter()
    }

    /// 各暗号語の解読結果を入力順で返す。
    pub fn decrypted(&self) -> &[String] {
        &self.decrypted
    }

    /// 解読結果を空白区切りで連結した文字列を返す。
    pub fn text(&self) -> String {
        self.decrypted.iter().join(" ")
    }

    pub fn into_mapping(self) -> Mapping {
        self.mapping
    }
}

/// 探索で見つかった全ての解。発見順に並ぶ。
///
/// 空であることは「整合する換字表が存在しない」という正常な結果を表す。
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Solutions {
    solutions: Vec<Solution>,
}

impl Solutions {
    pub(crate) fn new(solutions: Vec<Solution>) -> Self {
        Self { solutions }
    }

    /// 全ての解を含むスライスを返す。
    pub fn as_slice(&self) -> &[Solution] {
        &self.solutions
    }

    pub fn into_inner(self) -> Vec<Solution> {
        self.solutions
    }

    /// 解の一覧をレポート形式でフォーマットする `Display` オブジェクトを返す。
    ///
    /// ```text
    /// Found 1 consistent mapping(s):
    ///
    /// Mapping #1:
    ///   A -> t
    ///   B -> o
    /// Decrypted Text: to ot
    /// ```
    pub fn report(&self) -> SolutionsReport {
        SolutionsReport { solutions: self }
    }
}

impl std::ops::Deref for Solutions {
    type Target = [Solution];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl IntoIterator for Solutions {
    type Item = Solution;
    type IntoIter = std::vec::IntoIter<Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.into_iter()
    }
}

impl<'a> IntoIterator for &'a Solutions {
    type Item = &'a Solution;
    type IntoIter = std::slice::Iter<'a, Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug)]
pub struct SolutionsReport<'a> {
    solutions: &'a Solutions,
}

impl std::fmt::Display for SolutionsReport<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.solutions.is_empty() {
            return f.write_str("No consistent mapping could be found.");
        }

        write!(f, "Found {} consistent mapping(s):", self.solutions.len())?;

        for (i, solution) in self.solutions.iter().enumerate() {
            write!(f, "\n\nMapping #{}:", i + 1)?;
            for (c, p) in solution.bindings() {
                write!(f, "\n  {c} -> {p}")?;
            }
            write!(f, "\nDecrypted Text: {}", solution.text())?;
        }

        Ok(())
    }
}
