use std::time::{Duration, Instant};

use log::info;

use crate::mapping::Mapping;

/// 探索中の進捗通知。
#[derive(Clone, Copy, Debug)]
pub struct Progress<'a> {
    /// 探索順で何番目の暗号語を割り当てているか (0-origin)。
    pub index: usize,
    /// 暗号語の総数。
    pub total: usize,
    /// 割り当て中の暗号語。
    pub cipher: &'a str,
    /// 試している候補語。
    pub candidate: &'a str,
    /// この時点までに確定している換字表。
    pub mapping: &'a Mapping,
}

/// 進捗通知の受け手。
///
/// 探索は各候補を試す直前に `observe()` を呼ぶ。通知は探索結果に一切影響しない。
pub trait ProgressObserver {
    fn observe(&mut self, progress: &Progress<'_>);
}

impl<F: FnMut(&Progress<'_>)> ProgressObserver for F {
    fn observe(&mut self, progress: &Progress<'_>) {
        self(progress)
    }
}

/// 通知を全て捨てる。
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn observe(&mut self, _progress: &Progress<'_>) {}
}

/// 通知を `info` レベルでログ出力する。
#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn observe(&mut self, progress: &Progress<'_>) {
        info!(
            "still working... trying word #{}/{}: '{}' -> '{}'",
            progress.index + 1,
            progress.total,
            progress.cipher,
            progress.candidate
        );
        info!("current mapping so far: {}", progress.mapping.display());
    }
}

/// 内側の observer への通知を、前回の通知から `interval` 以上経過したときだけに間引く。
///
/// 最初の通知も生成時刻から `interval` が経過するまでは行わない。
#[derive(Debug)]
pub struct Throttled<O> {
    inner: O,
    interval: Duration,
    last: Instant,
}

impl<O: ProgressObserver> Throttled<O> {
    pub fn new(inner: O, interval: Duration) -> Self {
        Self {
            inner,
            interval,
            last: Instant::now(),
        }
    }

    /// 内側の observer を返す。
    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: ProgressObserver> ProgressObserver for Throttled<O> {
    fn observe(&mut self, progress: &Progress<'_>) {
        let now = Instant::now();
        if now.duration_since(self.last) >= self.interval {
            self.last = now;
            self.inner.observe(progress);
        }
    }
}
