use killcam_protocol::Stream;

/// Share of the overall progress bar given to the music upload when a
/// music file is present (percent).
pub const DEFAULT_MUSIC_SHARE: u8 = 30;

/// Byte progress of one file after a confirmed chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressReport {
    pub loaded: u64,
    pub total: u64,
}

impl ProgressReport {
    /// Rounded percentage (0-100).
    ///
    /// A zero-byte file is fully transferred once its single empty chunk is
    /// confirmed, so a zero total reads as 100.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let pct = (self.loaded as f64 * 100.0 / self.total as f64).round();
        pct.clamp(0.0, 100.0) as u8
    }
}

/// Maps per-stream percentages onto one 0-100 composite value.
///
/// Shares are integer percentages so the composite lands exactly on the
/// music share when music finishes and exactly on 100 when video finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressWeights {
    music_share: u8,
}

impl ProgressWeights {
    /// Weights for a submission; without music the video owns the whole bar.
    pub fn new(has_music: bool, music_share: u8) -> Self {
        Self {
            music_share: if has_music { music_share.min(100) } else { 0 },
        }
    }

    pub fn music_share(&self) -> u8 {
        self.music_share
    }

    pub fn video_share(&self) -> u8 {
        100 - self.music_share
    }

    /// Composite percentage for a `percent` reading of `stream`.
    ///
    /// Music is scaled into `[0, music_share]`; video into
    /// `[music_share, 100]`.
    pub fn composite(&self, stream: Stream, percent: u8) -> f64 {
        let percent = u32::from(percent.min(100));
        let music = u32::from(self.music_share);
        let video = u32::from(self.video_share());
        let scaled = match stream {
            Stream::Music => percent * music,
            Stream::Video => 100 * music + percent * video,
        };
        f64::from(scaled) / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    #[test]
    fn percent_rounds() {
        let r = ProgressReport { loaded: MIB, total: MIB * 3 / 2 };
        assert_eq!(r.percent(), 67);
        let r = ProgressReport { loaded: 1, total: 3 };
        assert_eq!(r.percent(), 33);
    }

    #[test]
    fn percent_scenario_two_and_a_half_mib() {
        let total = MIB * 5 / 2;
        let readings: Vec<u8> = [MIB, 2 * MIB, total]
            .into_iter()
            .map(|loaded| ProgressReport { loaded, total }.percent())
            .collect();
        assert_eq!(readings, vec![40, 80, 100]);
    }

    #[test]
    fn percent_zero_total_reads_full() {
        let r = ProgressReport { loaded: 0, total: 0 };
        assert_eq!(r.percent(), 100);
    }

    #[test]
    fn composite_music_finishes_at_share() {
        let w = ProgressWeights::new(true, DEFAULT_MUSIC_SHARE);
        assert_eq!(w.composite(Stream::Music, 100), 30.0);
        assert_eq!(w.composite(Stream::Music, 0), 0.0);
    }

    #[test]
    fn composite_video_finishes_at_hundred() {
        let w = ProgressWeights::new(true, DEFAULT_MUSIC_SHARE);
        assert_eq!(w.composite(Stream::Video, 0), 30.0);
        assert_eq!(w.composite(Stream::Video, 50), 65.0);
        assert_eq!(w.composite(Stream::Video, 100), 100.0);
    }

    #[test]
    fn composite_without_music_is_raw_video() {
        let w = ProgressWeights::new(false, DEFAULT_MUSIC_SHARE);
        assert_eq!(w.music_share(), 0);
        assert_eq!(w.video_share(), 100);
        for pct in [0u8, 1, 33, 40, 80, 99, 100] {
            assert_eq!(w.composite(Stream::Video, pct), f64::from(pct));
        }
    }

    #[test]
    fn composite_is_monotonic_across_streams() {
        let w = ProgressWeights::new(true, 30);
        let mut last = -1.0;
        for stream in [Stream::Music, Stream::Video] {
            for pct in 0..=100u8 {
                let v = w.composite(stream, pct);
                assert!(v >= last, "{stream} {pct}: {last} -> {v}");
                last = v;
            }
        }
        assert_eq!(last, 100.0);
    }

    #[test]
    fn share_is_clamped() {
        let w = ProgressWeights::new(true, 250);
        assert_eq!(w.music_share(), 100);
        assert_eq!(w.video_share(), 0);
        assert_eq!(w.composite(Stream::Video, 100), 100.0);
    }
}
