//! PCM sample sources.
//!
//! The analyzer consumes decoded audio through the [`SampleSource`] trait:
//! a sequential stream of interleaved f32 sample blocks plus the stream
//! metadata needed downstream (sample rate, channel count, frame rate,
//! total frames). The production implementation decodes with a spawned
//! FFmpeg; an in-memory source backs the tests.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{AudioError, AudioResult};
use crate::probe::{probe_streams, StreamInfo};

/// Preferred read size in bytes (multiple of 4 so blocks hold whole
/// samples).
const BLOCK_BYTES: usize = 256 * 1024;

/// A sequential source of decoded PCM samples.
#[async_trait]
pub trait SampleSource: Send {
    /// Stream metadata, available before any samples are read.
    fn info(&self) -> &StreamInfo;

    /// Read the next block of interleaved f32 samples.
    ///
    /// Returns `Ok(None)` at end of stream. A decode failure surfaces as
    /// an error; it never silently truncates the stream.
    async fn read_block(&mut self) -> AudioResult<Option<Vec<f32>>>;
}

/// Sample source decoding any FFmpeg-readable recording to raw f32le PCM
/// at the stream's native sample rate and channel count.
pub struct FfmpegSampleSource {
    info: StreamInfo,
    path: PathBuf,
    child: Child,
    stdout: ChildStdout,
    stderr_task: JoinHandle<String>,
    /// Carry-over bytes that do not yet form a whole f32 sample.
    pending: Vec<u8>,
    finished: bool,
}

impl FfmpegSampleSource {
    /// Probe the recording and spawn the decoder.
    pub async fn open(path: impl AsRef<Path>) -> AudioResult<Self> {
        let path = path.as_ref();
        let info = probe_streams(path).await?;

        which::which("ffmpeg").map_err(|_| AudioError::FfmpegNotFound)?;

        debug!(
            path = %path.display(),
            sample_rate = info.sample_rate,
            channels = info.channels,
            fps = info.fps,
            "Spawning FFmpeg audio decoder"
        );

        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(path)
            .args(["-vn", "-f", "f32le", "-acodec", "pcm_f32le", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child.stdout.take().ok_or_else(|| {
            AudioError::decode_failed("FFmpeg stdout not captured", None, None)
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            AudioError::decode_failed("FFmpeg stderr not captured", None, None)
        })?;

        // Drain stderr concurrently so the decoder cannot block on it.
        let stderr_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            let mut collected = String::new();
            while let Ok(Some(line)) = lines.next_line().await {
                collected.push_str(&line);
                collected.push('\n');
            }
            collected
        });

        Ok(Self {
            info,
            path: path.to_path_buf(),
            child,
            stdout,
            stderr_task,
            pending: Vec::new(),
            finished: false,
        })
    }

    async fn finish(&mut self) -> AudioResult<()> {
        self.finished = true;
        let status = self.child.wait().await?;
        let stderr = match (&mut self.stderr_task).await {
            Ok(s) if !s.is_empty() => Some(s),
            _ => None,
        };
        if status.success() {
            Ok(())
        } else {
            Err(AudioError::decode_failed(
                format!("FFmpeg decode of {} failed", self.path.display()),
                stderr,
                status.code(),
            ))
        }
    }
}

#[async_trait]
impl SampleSource for FfmpegSampleSource {
    fn info(&self) -> &StreamInfo {
        &self.info
    }

    async fn read_block(&mut self) -> AudioResult<Option<Vec<f32>>> {
        if self.finished {
            return Ok(None);
        }

        let mut buf = vec![0u8; BLOCK_BYTES];
        loop {
            let n = self.stdout.read(&mut buf).await?;
            if n == 0 {
                // A trailing fragment shorter than one sample is a decoder
                // artifact, not audio.
                self.pending.clear();
                self.finish().await?;
                return Ok(None);
            }
            self.pending.extend_from_slice(&buf[..n]);

            let whole = self.pending.len() - self.pending.len() % 4;
            if whole == 0 {
                continue;
            }
            let samples: Vec<f32> = self.pending[..whole]
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect();
            self.pending.drain(..whole);
            return Ok(Some(samples));
        }
    }
}

/// In-memory sample source for tests and synthetic recordings.
pub struct MemorySampleSource {
    info: StreamInfo,
    samples: Vec<f32>,
    pos: usize,
    block_len: usize,
}

impl MemorySampleSource {
    pub fn new(info: StreamInfo, samples: Vec<f32>) -> Self {
        Self {
            info,
            samples,
            pos: 0,
            block_len: 4096,
        }
    }

    /// Override the block size handed out per read.
    pub fn with_block_len(mut self, block_len: usize) -> Self {
        self.block_len = block_len.max(1);
        self
    }

    /// Rewind to the start of the stream.
    pub fn reset(&mut self) {
        self.pos = 0;
    }
}

#[async_trait]
impl SampleSource for MemorySampleSource {
    fn info(&self) -> &StreamInfo {
        &self.info
    }

    async fn read_block(&mut self) -> AudioResult<Option<Vec<f32>>> {
        if self.pos >= self.samples.len() {
            return Ok(None);
        }
        let end = (self.pos + self.block_len).min(self.samples.len());
        let block = self.samples[self.pos..end].to_vec();
        self.pos = end;
        Ok(Some(block))
    }
}
