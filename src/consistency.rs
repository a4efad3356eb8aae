use std::rc::Rc;

use fxhash::FxHashMap;

use crate::candidates::Variable;
use crate::mapping::Mapping;

/// 候補語 `candidate` が換字表 `mapping` の下で暗号語 `cipher` の解読結果になりうるかどうかを返す。
///
/// 位置ごとに先頭から走査し、以下のいずれかに当たれば偽:
///
/// * 暗号文字が既に別の平文文字へ写されている。
/// * 暗号文字が未割り当てで、平文文字が既に別の暗号文字の像になっている。
///
/// 同じ語の前方の位置で仮に決めた束縛も考慮する。`mapping` 自体は変更しない。
/// 長さが異なる場合の結果は未規定(呼び出し側で形状が一致していることを前提とする)。
pub fn is_consistent(cipher: &str, candidate: &str, mapping: &Mapping) -> bool {
    // この語の中で新たに決まった束縛。語は短いので線形探索で十分。
    let mut fresh: Vec<(char, char)> = Vec::new();

    for (c, p) in cipher.chars().zip(candidate.chars()) {
        let image = mapping
            .get(c)
            .or_else(|| fresh.iter().find(|&&(fc, _)| fc == c).map(|&(_, fp)| fp));

        match image {
            Some(image) => {
                if image != p {
                    return false;
                }
            }
            None => {
                if mapping.is_used(p) || fresh.iter().any(|&(_, fp)| fp == p) {
                    return false;
                }
                fresh.push((c, p));
            }
        }
    }

    true
}

/// `ConsistencyCache` の利用統計。
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct CacheStats {
    /// キャッシュから結果を返した回数。
    pub hits: u64,
    /// 実際に判定を行った回数。
    pub misses: u64,
    /// 記録されている換字表の個数。
    pub mappings: usize,
}

/// `is_consistent()` のメモ化テーブル。
///
/// キーは (暗号語, 候補語, 換字表)。1 回の探索の間は追い出しを行わず、探索終了とともに破棄する。
#[derive(Debug, Default)]
pub struct ConsistencyCache {
    // 換字表を外側のキーにすることで、検索時に換字表を複製せずに済む。
    table: FxHashMap<Mapping, FxHashMap<(Rc<str>, Rc<str>), bool>>,
    hits: u64,
    misses: u64,
}

impl ConsistencyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// メモ化された `is_consistent()`。
    pub fn check(&mut self, cipher: &Rc<str>, candidate: &Rc<str>, mapping: &Mapping) -> bool {
        let key = (Rc::clone(cipher), Rc::clone(candidate));

        if let Some(&res) = self.table.get(mapping).and_then(|row| row.get(&key)) {
            self.hits += 1;
            return res;
        }

        self.misses += 1;
        let res = is_consistent(cipher, candidate, mapping);
        match self.table.get_mut(mapping) {
            Some(row) => {
                row.insert(key, res);
            }
            None => {
                let mut row = FxHashMap::default();
                row.insert(key, res);
                self.table.insert(mapping.clone(), row);
            }
        }

        res
    }

    /// 利用統計を返す。
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            mappings: self.table.len(),
        }
    }
}

/// 前方検査。`assigned` より後ろの変数のうち、`mapping` の下で整合する候補を 1 つも持たないものがあるかどうかを返す。
///
/// 毎回全ての残り変数を走査し直す。
pub fn has_dead_end(
    assigned: usize,
    variables: &[Variable],
    mapping: &Mapping,
    cache: &mut ConsistencyCache,
) -> bool {
    variables.iter().skip(assigned + 1).any(|var| {
        !var
            .candidate_entries()
            .iter()
            .any(|cand| cache.check(var.cipher_entry(), cand, mapping))
    })
}
