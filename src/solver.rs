use std::time::Duration;

use log::{debug, trace};
use thiserror::Error;

use crate::candidates::{index_candidates, order_by_remaining, Variable};
use crate::consistency::{has_dead_end, ConsistencyCache};
use crate::dictionary::Dictionary;
use crate::mapping::Mapping;
use crate::progress::{LogProgress, Progress, ProgressObserver, Throttled};
use crate::solution::{Solution, Solutions};

/// 辞書が空のときの扱い。
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum EmptyDictionary {
    /// 通常通り探索する。暗号語が 1 つ以上あれば解は 0 個になる。
    #[default]
    Allow,
    /// `SolveError::EmptyDictionary` を返す。
    Reject,
}

/// 探索の設定。
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SolverOptions {
    progress_interval: Duration,
    empty_dictionary: EmptyDictionary,
}

impl SolverOptions {
    /// 進捗ログの既定の間隔。
    pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(10);

    /// `Solver::solve()` が進捗をログ出力する最小間隔を設定する。
    pub fn progress_interval(self, progress_interval: Duration) -> Self {
        Self {
            progress_interval,
            ..self
        }
    }

    /// 辞書が空のときの扱いを設定する。
    pub fn empty_dictionary(self, empty_dictionary: EmptyDictionary) -> Self {
        Self {
            empty_dictionary,
            ..self
        }
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            progress_interval: Self::DEFAULT_PROGRESS_INTERVAL,
            empty_dictionary: EmptyDictionary::default(),
        }
    }
}

/// 単一換字式暗号のソルバー。
///
/// 暗号語ごとに形状の一致する辞書語を候補とし、候補数の少ない暗号語から順にバックトラックで割り当てる。
/// 各分岐では残りの暗号語に整合する候補が残っているかを前方検査し、行き詰まる分岐には再帰しない。
/// 最初の解で打ち切らず、整合する換字表を全て列挙する。
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Solver {
    options: SolverOptions,
}

impl Solver {
    pub fn new(options: SolverOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// 全ての解を発見順で返す。進捗は `SolverOptions` で設定した間隔で `info` レベルのログに出る。
    pub fn solve<S: AsRef<str>>(
        &self,
        cipher_words: &[S],
        dictionary: &Dictionary,
    ) -> Result<Solutions, SolveError> {
        let mut observer = Throttled::new(LogProgress, self.options.progress_interval);
        self.solve_with(cipher_words, dictionary, &mut observer)
    }

    /// `solve()` と同じだが、進捗を `observer` へ毎回通知する(間引きは observer 側の責任)。
    pub fn solve_with<S, O>(
        &self,
        cipher_words: &[S],
        dictionary: &Dictionary,
        observer: &mut O,
    ) -> Result<Solutions, SolveError>
    where
        S: AsRef<str>,
        O: ProgressObserver,
    {
        if dictionary.is_empty() && self.options.empty_dictionary == EmptyDictionary::Reject {
            return Err(SolveError::EmptyDictionary);
        }

        let mut variables = index_candidates(cipher_words, dictionary);
        order_by_remaining(&mut variables);

        let mut search = Search {
            variables: &variables,
            cache: ConsistencyCache::new(),
            observer,
            found: Vec::new(),
        };
        search.dfs(0, &Mapping::new());

        let stats = search.cache.stats();
        debug!(
            "search finished: {} solution(s), cache {} hits / {} misses over {} mappings",
            search.found.len(),
            stats.hits,
            stats.misses,
            stats.mappings
        );

        let solutions = search
            .found
            .into_iter()
            .map(|mapping| Solution::new(mapping, cipher_words))
            .collect();

        Ok(Solutions::new(solutions))
    }
}

/// 1 回の探索の状態。メモ化テーブルはこの探索の間だけ生きる。
struct Search<'a, O> {
    variables: &'a [Variable],
    cache: ConsistencyCache,
    observer: &'a mut O,
    found: Vec<Mapping>,
}

impl<O: ProgressObserver> Search<'_, O> {
    fn dfs(&mut self, index: usize, mapping: &Mapping) {
        let variables = self.variables;

        // 全ての暗号語が割り当てられたら解として記録して戻る。
        let Some(var) = variables.get(index) else {
            self.found.push(mapping.clone());
            return;
        };

        for candidate in var.candidate_entries() {
            self.observer.observe(&Progress {
                index,
                total: variables.len(),
                cipher: var.cipher(),
                candidate,
                mapping,
            });

            if !self.cache.check(var.cipher_entry(), candidate, mapping) {
                continue;
            }

            let Some(extended) = mapping.extended(var.cipher(), candidate) else {
                continue;
            };

            // 枝刈り: 後続の暗号語のいずれかに候補が残らないなら再帰しない。
            if has_dead_end(index, variables, &extended, &mut self.cache) {
                trace!("pruned '{}' -> '{candidate}' at depth {index}", var.cipher());
                continue;
            }

            self.dfs(index + 1, &extended);
        }
    }
}

/// 探索の開始時に発生しうるエラー。
///
/// 解が見つからないことはエラーではない(空の `Solutions` が返る)。
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SolveError {
    /// 辞書が空(`EmptyDictionary::Reject` のときのみ)。
    #[error("dictionary contains no words")]
    EmptyDictionary,
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use itertools::Itertools as _;

    use crate::progress::NoProgress;

    use super::*;

    fn solve(cipher_words: &[&str], words: &[&str]) -> Solutions {
        Solver::default()
            .solve_with(cipher_words, &Dictionary::from_words(words), &mut NoProgress)
            .unwrap()
    }

    fn texts(solutions: &Solutions) -> Vec<String> {
        solutions.iter().map(Solution::text).collect()
    }

    fn mapping_set(solutions: &Solutions) -> BTreeSet<Mapping> {
        solutions.iter().map(|s| s.mapping().clone()).collect()
    }

    /// 重複文字の位置パターン。"ABA" -> [0, 1, 0]。
    fn pattern(word: &str) -> Vec<usize> {
        let mut seen: Vec<char> = Vec::new();
        word.chars()
            .map(|c| {
                let pos = seen.iter().position(|&s| s == c);
                pos.unwrap_or_else(|| {
                    seen.push(c);
                    seen.len() - 1
                })
            })
            .collect()
    }

    /// 候補の直積を全て試す素朴な列挙。
    fn brute_force(cipher_words: &[&str], words: &[&str]) -> BTreeSet<Mapping> {
        cipher_words
            .iter()
            .map(|cipher| {
                words
                    .iter()
                    .copied()
                    .filter(|w| pattern(w) == pattern(cipher))
                    .collect::<Vec<_>>()
            })
            .multi_cartesian_product()
            .filter_map(|assignment| {
                cipher_words
                    .iter()
                    .zip(&assignment)
                    .try_fold(Mapping::new(), |m, (cipher, plain)| m.extended(cipher, plain))
            })
            .collect()
    }

    const WORDS: &[&str] = &[
        "a", "i", "at", "it", "to", "ta", "on", "no", "in", "an", "do", "go", "act", "cat", "tac",
        "tic", "dog", "god", "and", "dad", "did", "tot", "toad", "data", "into", "iota", "ant",
        "tan", "nag", "tin",
    ];

    #[test]
    fn test_single_word() {
        let solutions = solve(&["AB"], &["on", "to", "in"]);

        assert_eq!(texts(&solutions), ["on", "to", "in"]);
        itertools::assert_equal(solutions[0].bindings(), [('A', 'o'), ('B', 'n')]);
        itertools::assert_equal(solutions[1].bindings(), [('A', 't'), ('B', 'o')]);
        itertools::assert_equal(solutions[2].bindings(), [('A', 'i'), ('B', 'n')]);
    }

    #[test]
    fn test_cross_word_consistency() {
        let solutions = solve(&["AB", "BA"], &["to", "ot", "on", "no"]);

        // 4 語とも逆順が辞書にあるので、全て解になる。
        assert_eq!(texts(&solutions), ["to ot", "ot to", "on no", "no on"]);
    }

    #[test]
    fn test_cross_word_pruning() {
        // "on" の逆順 "no" が辞書にないので、AB -> on は刈られる。
        let solutions = solve(&["AB", "BA"], &["to", "ot", "on"]);

        assert_eq!(texts(&solutions), ["to ot", "ot to"]);
        assert!(solutions
            .iter()
            .all(|s| s.mapping().get('A') != Some('o') || s.mapping().get('B') != Some('n')));
    }

    #[test]
    fn test_no_matching_shape() {
        let solutions = solve(&["XYZXYZ"], &["abcdef", "google", "xyz", "abcabd"]);

        assert!(solutions.is_empty());
        assert_eq!(
            solutions.report().to_string(),
            "No consistent mapping could be found."
        );
    }

    #[test]
    fn test_empty_cipher_text() {
        let solutions = solve(&[], &["on"]);

        assert_eq!(solutions.len(), 1);
        assert!(solutions[0].mapping().is_empty());
        assert!(solutions[0].decrypted().is_empty());
        assert_eq!(solutions[0].text(), "");
    }

    #[test]
    fn test_empty_dictionary_allow() {
        assert!(solve(&["AB"], &[]).is_empty());
        assert_eq!(solve(&[], &[]).len(), 1);
    }

    #[test]
    fn test_empty_dictionary_reject() {
        let solver =
            Solver::new(SolverOptions::default().empty_dictionary(EmptyDictionary::Reject));

        assert_eq!(
            solver.solve(&["AB"], &Dictionary::default()),
            Err(SolveError::EmptyDictionary)
        );
        assert!(solver
            .solve(&["AB"], &Dictionary::from_words(["to"]))
            .is_ok());
    }

    #[test]
    fn test_pattern_checked_during_search() {
        // "dad" と "did" は形状で候補に残るが、位置パターンが違うので ABB には当てはまらない。
        let solutions = solve(&["ABB"], &["dad", "too", "did", "see"]);
        assert_eq!(texts(&solutions), ["too", "see"]);
    }

    #[test]
    fn test_repeated_cipher_word() {
        let solutions = solve(&["AB", "AB"], &["to", "on"]);
        assert_eq!(texts(&solutions), ["to to", "on on"]);
    }

    #[test]
    fn test_decrypted_in_input_order() {
        // "ABC" は候補が多いので後回しにされるが、出力は入力順。
        let solutions = solve(&["ABC", "A"], &["cat", "act", "tic", "a"]);
        assert_eq!(texts(&solutions), ["act a"]);
    }

    #[test]
    fn test_injective() {
        let solutions = solve(&["ABC", "CD", "BA"], WORDS);

        assert!(!solutions.is_empty());
        for solution in &solutions {
            let images: BTreeSet<char> = solution.bindings().map(|(_, p)| p).collect();
            assert_eq!(images.len(), solution.mapping().len());
        }
    }

    #[test]
    fn test_shape_fidelity() {
        let cipher_words = ["ABC", "CD", "BA", "AD"];
        let dictionary = Dictionary::from_words(WORDS);
        let variables = index_candidates(&cipher_words, &dictionary);

        let solutions = Solver::default()
            .solve_with(&cipher_words, &dictionary, &mut NoProgress)
            .unwrap();
        assert!(!solutions.is_empty());

        for solution in &solutions {
            for (plain, var) in solution.decrypted().iter().zip(&variables) {
                assert!(!plain.contains(Mapping::PLACEHOLDER));
                assert!(var.candidates().any(|c| c == plain.as_str()));
            }
        }
    }

    #[test]
    fn test_matches_brute_force() {
        let cases: &[&[&str]] = &[
            &["AB"],
            &["AB", "BA"],
            &["ABC", "CBA"],
            &["ABC", "CD", "BA"],
            &["AB", "CD", "EF"],
            &["ABCD", "BA", "C"],
            &["ABA", "BC"],
            &["ABC", "BCA", "DE"],
        ];

        for &cipher_words in cases {
            let solutions = solve(cipher_words, WORDS);
            assert_eq!(
                mapping_set(&solutions),
                brute_force(cipher_words, WORDS),
                "{cipher_words:?}"
            );
            // 同じ換字表が 2 回見つかることはない(辞書に重複がない場合)。
            assert_eq!(solutions.len(), mapping_set(&solutions).len());
        }
    }

    #[test]
    fn test_order_invariance() {
        let cipher_words = ["ABC", "CD", "BA", "E"];
        let expected = mapping_set(&solve(&cipher_words, WORDS));
        assert!(!expected.is_empty());

        for perm in cipher_words.iter().copied().permutations(cipher_words.len()) {
            assert_eq!(mapping_set(&solve(&perm, WORDS)), expected, "{perm:?}");
        }
    }

    #[test]
    fn test_deterministic() {
        let cipher_words = ["ABC", "CD", "BA"];
        assert_eq!(solve(&cipher_words, WORDS), solve(&cipher_words, WORDS));
    }

    #[test]
    fn test_progress_notified() {
        let mut seen = Vec::new();
        let solutions = Solver::default()
            .solve_with(
                &["AB"],
                &Dictionary::from_words(["on", "to"]),
                &mut |p: &Progress<'_>| seen.push((p.index, p.total, p.candidate.to_owned())),
            )
            .unwrap();

        assert_eq!(solutions.len(), 2);
        assert_eq!(seen, [(0, 1, "on".to_owned()), (0, 1, "to".to_owned())]);
    }
}
