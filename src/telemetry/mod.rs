//! Telemetry for generation calls
//!
//! Collects per-call statistics from the decoded chunks and renders them
//! on the terminal.

use crate::types::GenerationChunk;
use colored::Colorize;
use std::time::{Duration, Instant};

/// Statistics of one generation call
#[derive(Debug, Clone)]
pub struct GenerationStats {
    pub chunks: usize,
    pub response_bytes: usize,
    /// Server-reported, from the final chunk
    pub total_duration: Duration,
    /// Server-reported, from the final chunk
    pub load_duration: Duration,
    /// Client-side time from request to final chunk
    pub wall_time: Duration,
    start_time: Instant,
}

impl GenerationStats {
    /// Start measuring a call
    pub fn start() -> Self {
        Self {
            chunks: 0,
            response_bytes: 0,
            total_duration: Duration::ZERO,
            load_duration: Duration::ZERO,
            wall_time: Duration::ZERO,
            start_time: Instant::now(),
        }
    }

    /// Record a decoded chunk
    pub fn record(&mut self, chunk: &GenerationChunk) {
        self.chunks += 1;
        self.response_bytes += chunk.response_text.len();

        if chunk.done {
            self.total_duration = chunk.total_duration;
            self.load_duration = chunk.load_duration;
            self.wall_time = self.start_time.elapsed();
        }
    }

    /// Client wall time minus server total, roughly network and queueing
    pub fn overhead(&self) -> Duration {
        self.wall_time.saturating_sub(self.total_duration)
    }
}

impl Default for GenerationStats {
    fn default() -> Self {
        Self::start()
    }
}

/// Terminal rendering of [`GenerationStats`]
pub struct StatsDisplay<'a> {
    stats: &'a GenerationStats,
    verbosity: crate::cli::Verbosity,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(stats: &'a GenerationStats, verbosity: crate::cli::Verbosity) -> Self {
        Self { stats, verbosity }
    }

    /// Summary lines; empty unless verbose
    pub fn render(&self) -> Vec<String> {
        if !self.verbosity.show_events() {
            return Vec::new();
        }

        let mut lines = vec![
            format!("{} {:?}", "Total duration:".bold(), self.stats.total_duration),
            format!("{} {:?}", "Load duration: ".bold(), self.stats.load_duration),
        ];

        if self.verbosity.show_tokens() {
            lines.push(format!("{} {}", "Chunks:        ".dimmed(), self.stats.chunks));
            lines.push(format!("{} {}", "Response bytes:".dimmed(), self.stats.response_bytes));
            lines.push(format!("{} {:?}", "Wall time:     ".dimmed(), self.stats.wall_time));
            lines.push(format!("{} {:?}", "Overhead:      ".dimmed(), self.stats.overhead()));
        }

        lines
    }

    /// Print the summary on stderr
    pub fn display_summary(&self) {
        let lines = self.render();
        if lines.is_empty() {
            return;
        }

        eprintln!();
        for line in lines {
            eprintln!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Verbosity;

    fn chunk(text: &str, done: bool) -> GenerationChunk {
        GenerationChunk {
            model: "mistral".to_string(),
            created_at: "t0".to_string(),
            response_text: text.to_string(),
            done,
            error: None,
            total_duration: if done { Duration::from_nanos(100) } else { Duration::ZERO },
            load_duration: if done { Duration::from_nanos(10) } else { Duration::ZERO },
        }
    }

    #[test]
    fn test_record_chunks() {
        let mut stats = GenerationStats::start();
        stats.record(&chunk("Hal", false));
        stats.record(&chunk("lo", true));

        assert_eq!(stats.chunks, 2);
        assert_eq!(stats.response_bytes, 5);
        assert_eq!(stats.total_duration, Duration::from_nanos(100));
        assert_eq!(stats.load_duration, Duration::from_nanos(10));
    }

    #[test]
    fn test_intermediate_chunk_keeps_zero_durations() {
        let mut stats = GenerationStats::start();
        stats.record(&chunk("Hal", false));

        assert_eq!(stats.total_duration, Duration::ZERO);
        assert_eq!(stats.wall_time, Duration::ZERO);
    }

    #[test]
    fn test_render_by_verbosity() {
        let mut stats = GenerationStats::start();
        stats.record(&chunk("x", true));

        assert!(StatsDisplay::new(&stats, Verbosity::Quiet).render().is_empty());
        assert!(StatsDisplay::new(&stats, Verbosity::Normal).render().is_empty());
        assert_eq!(StatsDisplay::new(&stats, Verbosity::Verbose).render().len(), 2);
        assert_eq!(StatsDisplay::new(&stats, Verbosity::VeryVerbose).render().len(), 6);
    }

    #[test]
    fn test_overhead_is_wall_time_minus_server_time() {
        let mut stats = GenerationStats::start();
        stats.total_duration = Duration::from_millis(700);
        stats.wall_time = Duration::from_millis(1000);
        assert_eq!(stats.overhead(), Duration::from_millis(300));

        // Clocks disagree: never negative
        stats.wall_time = Duration::from_millis(500);
        assert_eq!(stats.overhead(), Duration::ZERO);

        let lines = StatsDisplay::new(&stats, Verbosity::VeryVerbose).render();
        assert!(lines.last().unwrap().contains("0ns"));
    }
}
