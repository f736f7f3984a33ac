//! Waveform peaks and their presentation style.
//!
//! Decoding reduces a track to a coarse list of per-chunk peaks in one pass;
//! the UI later resamples those to however many bars fit on screen.

use ratatui::style::Color;

use crate::config::WaveformSettings;

/// Frames folded into a single coarse peak while decoding.
const COARSE_FRAMES: usize = 256;

/// Colors and geometry used to draw one handle's waveform.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformStyle {
    pub wave_top: Color,
    pub wave_bottom: Color,
    pub progress_top: Color,
    pub progress_bottom: Color,
    /// Fraction of the height drawn in the `*_top` colors.
    pub split: f32,
    /// Terminal cells per bar.
    pub bar_width: u16,
    /// Rows available to the waveform.
    pub height: u16,
}

impl Default for WaveformStyle {
    fn default() -> Self {
        Self {
            wave_top: Color::Rgb(0xEE, 0x77, 0x2F),
            wave_bottom: Color::Rgb(0xF6, 0xB0, 0x94),
            progress_top: Color::Rgb(0x65, 0x66, 0x66),
            progress_bottom: Color::Rgb(0xB1, 0xB1, 0xB1),
            split: 0.7,
            bar_width: 2,
            height: 4,
        }
    }
}

impl WaveformStyle {
    /// Build a style from settings, keeping the default for any color that fails to parse.
    pub fn from_settings(settings: &WaveformSettings) -> Self {
        let defaults = Self::default();
        let pick = |value: &str, fallback: Color| parse_hex_color(value).unwrap_or(fallback);
        Self {
            wave_top: pick(&settings.wave_top, defaults.wave_top),
            wave_bottom: pick(&settings.wave_bottom, defaults.wave_bottom),
            progress_top: pick(&settings.progress_top, defaults.progress_top),
            progress_bottom: pick(&settings.progress_bottom, defaults.progress_bottom),
            split: settings.split.clamp(0.0, 1.0),
            bar_width: settings.bar_width.max(1),
            height: settings.height.max(1),
        }
    }

    /// Color of a cell on `row` (0 = top) of `rows`, inside or outside the played part.
    pub fn color_at(&self, row: u16, rows: u16, played: bool) -> Color {
        let split_row = (f32::from(rows) * self.split).ceil() as u16;
        match (played, row < split_row) {
            (false, true) => self.wave_top,
            (false, false) => self.wave_bottom,
            (true, true) => self.progress_top,
            (true, false) => self.progress_bottom,
        }
    }
}

/// Parse `#RRGGBB` (the leading `#` is optional).
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Coarse peaks of a decoded stream plus the number of frames seen.
pub(crate) struct PeakSummary {
    pub coarse: Vec<f32>,
    pub frames: u64,
}

/// Fold interleaved samples into per-chunk absolute peaks.
pub(crate) fn summarize(samples: impl Iterator<Item = f32>, channels: u16) -> PeakSummary {
    let channels = usize::from(channels.max(1));
    let mut coarse = Vec::new();
    let mut frames: u64 = 0;
    let mut in_frame = 0usize;
    let mut in_chunk = 0usize;
    let mut chunk_peak = 0.0f32;

    for sample in samples {
        chunk_peak = chunk_peak.max(sample.abs());
        in_frame += 1;
        if in_frame == channels {
            in_frame = 0;
            frames += 1;
            in_chunk += 1;
            if in_chunk == COARSE_FRAMES {
                coarse.push(chunk_peak);
                chunk_peak = 0.0;
                in_chunk = 0;
            }
        }
    }
    if in_chunk > 0 || in_frame > 0 {
        coarse.push(chunk_peak);
    }

    PeakSummary { coarse, frames }
}

/// Reduce (or stretch) `peaks` to exactly `buckets` values, keeping maxima.
pub fn resample_peaks(peaks: &[f32], buckets: usize) -> Vec<f32> {
    if peaks.is_empty() || buckets == 0 {
        return Vec::new();
    }
    let len = peaks.len();
    (0..buckets)
        .map(|b| {
            let start = (b * len / buckets).min(len - 1);
            let end = ((b + 1) * len / buckets).clamp(start + 1, len);
            peaks[start..end].iter().copied().fold(0.0f32, f32::max)
        })
        .collect()
}

/// Scale peaks so the loudest one is `1.0`. Silent input is left alone.
pub(crate) fn normalize(peaks: &mut [f32]) {
    let max = peaks.iter().copied().fold(0.0f32, f32::max);
    if max > 0.0 {
        for p in peaks.iter_mut() {
            *p /= max;
        }
    }
}

/// Bar heights in eighths of a cell for `bars` bars over `rows` rows.
///
/// Any audible peak gets at least one eighth so quiet passages stay visible.
pub fn bar_levels(peaks: &[f32], bars: usize, rows: u16) -> Vec<u16> {
    let full = f32::from(rows) * 8.0;
    resample_peaks(peaks, bars)
        .into_iter()
        .map(|p| {
            let p = p.clamp(0.0, 1.0);
            let level = (p * full).round() as u16;
            if p > 0.0 { level.max(1) } else { 0 }
        })
        .collect()
}
