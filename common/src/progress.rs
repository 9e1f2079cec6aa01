//! 擬似プログレス
//!
//! 実際の転送量とは無関係に一定間隔で進む表示用カウンタ。
//! tickだけでは上限(90)で止まり、100になるのはcomplete()のみ。

use std::time::Duration;

/// tick間隔
pub const TICK_INTERVAL: Duration = Duration::from_millis(300);

/// 1tickあたりの増分
pub const TICK_STEP: u8 = 3;

/// tickで到達できる上限
pub const TICK_CEILING: u8 = 90;

/// 擬似プログレス（0〜100）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FakeProgress {
    value: u8,
}

impl FakeProgress {
    pub fn value(&self) -> u8 {
        self.value
    }

    /// 1段階進める（上限で頭打ち）
    pub fn tick(&mut self) {
        if self.value < TICK_CEILING {
            self.value = (self.value + TICK_STEP).min(TICK_CEILING);
        }
    }

    /// 完了
    pub fn complete(&mut self) {
        self.value = 100;
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_advances_by_step() {
        let mut progress = FakeProgress::default();
        progress.tick();
        progress.tick();
        assert_eq!(progress.value(), 6);
    }

    #[test]
    fn test_tick_never_reaches_complete() {
        let mut progress = FakeProgress::default();
        for _ in 0..1000 {
            progress.tick();
            assert!(progress.value() <= TICK_CEILING);
        }
        assert_eq!(progress.value(), TICK_CEILING);
    }

    #[test]
    fn test_complete_and_reset() {
        let mut progress = FakeProgress::default();
        progress.tick();
        progress.complete();
        assert_eq!(progress.value(), 100);

        // 完了後のtickでは下がらない
        progress.tick();
        assert_eq!(progress.value(), 100);

        progress.reset();
        assert_eq!(progress.value(), 0);
    }
}
