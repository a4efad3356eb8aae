use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

/// 平文の単語リスト。
///
/// 重複は除去しない。単語の順序は読み込み順のまま保持される。
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Dictionary {
    words: Vec<Rc<str>>,
}

impl Dictionary {
    /// 正規化済みの単語列から `Dictionary` を作る。
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words.into_iter().map(|w| Rc::from(w.as_ref())).collect(),
        }
    }

    /// 1 行 1 単語のテキストをパースする。
    ///
    /// 各行の前後の空白を除いて小文字化し、空行は無視する。
    pub fn parse(s: &str) -> Self {
        Self {
            words: s.lines().filter_map(normalize).collect(),
        }
    }

    /// 1 行 1 単語のテキストを読み込む。正規化は `parse()` と同じ。
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, DictionaryError> {
        let mut words = Vec::new();

        for line in reader.lines() {
            if let Some(word) = normalize(&line?) {
                words.push(word);
            }
        }

        Ok(Self { words })
    }

    /// 単語リストファイルを開いて読み込む。
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| DictionaryError::Open {
            path: path.to_owned(),
            source,
        })?;

        Self::from_reader(std::io::BufReader::new(file))
    }

    /// 単語数を返す。
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// 全ての単語を読み込み順で返す。
    pub fn iter(&self) -> impl Iterator<Item = &str> + ExactSizeIterator + '_ {
        self.words.iter().map(AsRef::as_ref)
    }

    pub(crate) fn entries(&self) -> &[Rc<str>] {
        &self.words
    }
}

impl<S: AsRef<str>> FromIterator<S> for Dictionary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_words(iter)
    }
}

fn normalize(line: &str) -> Option<Rc<str>> {
    let line = line.trim();
    (!line.is_empty()).then(|| Rc::from(line.to_lowercase()))
}

/// 単語リストの読み込み時に発生しうるエラー。
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// ファイルを開けない。
    #[error("cannot open dictionary file '{}'", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// 読み込み中のエラー(不正な UTF-8 を含む)。
    #[error("failed to read dictionary")]
    Read(#[from] std::io::Error),
}
