//! Windowed energy analysis.
//!
//! Consumes interleaved PCM blocks and produces one [`EnergyPoint`] per
//! fixed-duration window. Windows are non-overlapping; the hop equals the
//! window size. Energy is a normalized amplitude measure over the
//! channel-mixed signal, so the result is independent of channel count.

use commskip_models::EnergyPoint;

use crate::config::{AnalysisConfig, ChannelMix, EnergyMetric};
use crate::error::{AudioError, AudioResult};
use crate::probe::StreamInfo;

/// Streaming per-window energy computation.
///
/// Feed blocks with [`push_block`](Self::push_block) and flush the
/// trailing partial window with [`finish`](Self::finish). The trailing
/// window keeps its true shorter duration; it is never zero-padded, which
/// would bias its energy downward.
pub struct EnergyAnalyzer {
    channels: usize,
    sample_rate: f64,
    /// Frames (one sample per channel) per full window.
    window_frames: usize,
    metric: EnergyMetric,
    mix: ChannelMix,
    /// Interleaved samples not yet forming a full window.
    carry: Vec<f32>,
    window_index: u64,
    frames_consumed: u64,
}

impl EnergyAnalyzer {
    pub fn new(info: &StreamInfo, config: &AnalysisConfig) -> AudioResult<Self> {
        if info.sample_rate == 0 {
            return Err(AudioError::invalid_config("sample rate must be positive"));
        }
        if info.channels == 0 {
            return Err(AudioError::invalid_config("channel count must be positive"));
        }
        let window_frames =
            (config.window_secs * info.sample_rate as f64).round().max(1.0) as usize;
        Ok(Self {
            channels: info.channels as usize,
            sample_rate: info.sample_rate as f64,
            window_frames,
            metric: config.energy_metric,
            mix: config.channel_mix,
            carry: Vec::with_capacity(window_frames * info.channels as usize * 2),
            window_index: 0,
            frames_consumed: 0,
        })
    }

    /// Consume a block of interleaved samples, emitting every full window
    /// it completes.
    pub fn push_block(&mut self, block: &[f32], out: &mut Vec<EnergyPoint>) {
        self.carry.extend_from_slice(block);
        let window_len = self.window_frames * self.channels;
        while self.carry.len() >= window_len {
            let energy = self.window_energy(&self.carry[..window_len], self.window_frames);
            out.push(self.emit(self.window_frames, energy));
            self.carry.drain(..window_len);
        }
    }

    /// Flush the trailing partial window, if any.
    pub fn finish(&mut self) -> Option<EnergyPoint> {
        let frames = self.carry.len() / self.channels;
        if frames == 0 {
            self.carry.clear();
            return None;
        }
        let energy = self.window_energy(&self.carry[..frames * self.channels], frames);
        self.carry.clear();
        Some(self.emit(frames, energy))
    }

    fn emit(&mut self, frames: usize, energy: f64) -> EnergyPoint {
        let point = EnergyPoint {
            window_index: self.window_index,
            start_secs: self.frames_consumed as f64 / self.sample_rate,
            duration_secs: frames as f64 / self.sample_rate,
            energy,
        };
        self.window_index += 1;
        self.frames_consumed += frames as u64;
        point
    }

    fn window_energy(&self, samples: &[f32], frames: usize) -> f64 {
        let mut accum = 0.0f64;
        for frame in samples.chunks_exact(self.channels) {
            let mut mixed = 0.0f64;
            for &s in frame {
                mixed += s as f64;
            }
            if self.mix == ChannelMix::Average {
                mixed /= self.channels as f64;
            }
            match self.metric {
                EnergyMetric::Rms => accum += mixed * mixed,
                EnergyMetric::MeanAbs => accum += mixed.abs(),
            }
        }
        let mean = accum / frames as f64;
        match self.metric {
            EnergyMetric::Rms => mean.sqrt(),
            EnergyMetric::MeanAbs => mean,
        }
    }
}
