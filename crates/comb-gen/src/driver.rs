//! Enumeration driver: one chooser, one attempt, until the guide runs dry.

use crate::assembler::ProgramAssembler;
use crate::rejection::Rejection;
use comb_core::{GeneratorConfig, Result};
use comb_guide::{Chooser, Guide};
use comb_ir::Program;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Receives every accepted program.
pub trait ProgramSink {
    /// `index` counts accepted programs from 1; `choices` is the answer
    /// sequence that produced the program.
    fn emit(&mut self, index: u64, program: &Program, choices: &[usize]) -> Result<()>;
}

/// Keeps accepted programs in memory.
#[derive(Debug, Default)]
pub struct CollectSink {
    pub programs: Vec<(Program, Vec<usize>)>,
}

impl ProgramSink for CollectSink {
    fn emit(&mut self, _index: u64, program: &Program, choices: &[usize]) -> Result<()> {
        self.programs.push((program.clone(), choices.to_vec()));
        Ok(())
    }
}

/// Counters for one enumeration run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    pub attempts: u64,
    pub accepted: u64,
    pub degenerate_rejections: u64,
    pub dead_value_rejections: u64,
}

impl GenerationStats {
    pub fn rejected(&self) -> u64 {
        self.degenerate_rejections + self.dead_value_rejections
    }

    pub fn acceptance_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.accepted as f64 / self.attempts as f64
        }
    }

    fn record_rejection(&mut self, rejection: &Rejection) {
        match rejection {
            Rejection::DegenerateOperands { .. } => self.degenerate_rejections += 1,
            Rejection::DeadValue { .. } => self.dead_value_rejections += 1,
        }
    }
}

pub struct EnumerationDriver {
    assembler: ProgramAssembler,
    max_attempts: Option<u64>,
}

impl EnumerationDriver {
    pub fn new(config: GeneratorConfig) -> Self {
        let max_attempts = config.max_attempts;
        Self {
            assembler: ProgramAssembler::new(config),
            max_attempts,
        }
    }

    pub fn assembler(&self) -> &ProgramAssembler {
        &self.assembler
    }

    /// Build one program per chooser until the guide is exhausted or the
    /// attempt limit is reached. Rejections are counted and skipped; fatal
    /// errors stop the run.
    #[instrument(skip_all, fields(fuel = self.assembler.config().fuel))]
    pub fn run<G, S>(&self, guide: &mut G, sink: &mut S) -> Result<GenerationStats>
    where
        G: Guide,
        S: ProgramSink + ?Sized,
    {
        let mut stats = GenerationStats::default();

        loop {
            if self.max_attempts.is_some_and(|limit| stats.attempts >= limit) {
                debug!(limit = stats.attempts, "Attempt limit reached");
                break;
            }
            let Some(mut chooser) = guide.make_chooser() else {
                break;
            };

            let outcome = self.assembler.build_program(&mut chooser)?;
            stats.attempts += 1;

            match outcome {
                Ok(program) => {
                    stats.accepted += 1;
                    sink.emit(stats.accepted, &program, chooser.choices())?;
                    info!(
                        accepted = stats.accepted,
                        attempts = stats.attempts,
                        "Printed {} modules over {} total",
                        stats.accepted,
                        stats.attempts
                    );
                }
                Err(rejection) => {
                    stats.record_rejection(&rejection);
                    debug!(attempt = stats.attempts, %rejection, "Rejected candidate");
                }
            }
        }

        info!(
            attempts = stats.attempts,
            accepted = stats.accepted,
            degenerate = stats.degenerate_rejections,
            dead_value = stats.dead_value_rejections,
            "{} modules generated",
            stats.attempts
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comb_core::{Error, Type};
    use comb_guide::{BfsGuide, RandomGuide};

    fn driver(fuel: usize) -> EnumerationDriver {
        EnumerationDriver::new(GeneratorConfig {
            fuel,
            ..Default::default()
        })
    }

    #[test]
    fn test_fuel_one_accepts_nothing() {
        let mut sink = CollectSink::default();
        let stats = driver(1).run(&mut BfsGuide::new(), &mut sink).unwrap();

        // 2 families x (8 or 5 opcodes) x 3 x 3 operand picks
        assert_eq!(stats.attempts, 117);
        assert_eq!(stats.accepted, 0);
        assert_eq!(stats.degenerate_rejections, 21);
        assert_eq!(stats.dead_value_rejections, 96);
        assert!(sink.programs.is_empty());
    }

    #[test]
    fn test_attempt_limit() {
        let config = GeneratorConfig {
            fuel: 2,
            max_attempts: Some(50),
            ..Default::default()
        };
        let stats = EnumerationDriver::new(config)
            .run(&mut BfsGuide::new(), &mut CollectSink::default())
            .unwrap();
        assert_eq!(stats.attempts, 50);
        assert_eq!(stats.accepted + stats.rejected(), 50);
    }

    #[test]
    fn test_random_guide_sample_count() {
        let mut sink = CollectSink::default();
        let stats = driver(3).run(&mut RandomGuide::new(42, 500), &mut sink).unwrap();
        assert_eq!(stats.attempts, 500);
        assert_eq!(stats.accepted as usize, sink.programs.len());
        assert_eq!(stats.accepted + stats.rejected(), stats.attempts);
    }

    #[test]
    fn test_precondition_aborts_run() {
        let config = GeneratorConfig {
            fuel: 1,
            arguments: vec![Type::I1],
            ..Default::default()
        };
        let err = EnumerationDriver::new(config)
            .run(&mut BfsGuide::new(), &mut CollectSink::default())
            .unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    struct FailingSink;

    impl ProgramSink for FailingSink {
        fn emit(&mut self, _index: u64, _program: &Program, _choices: &[usize]) -> Result<()> {
            Err(Error::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed")))
        }
    }

    #[test]
    fn test_sink_errors_propagate() {
        let err = driver(2).run(&mut BfsGuide::new(), &mut FailingSink).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_stats_helpers() {
        let stats = GenerationStats {
            attempts: 10,
            accepted: 4,
            degenerate_rejections: 1,
            dead_value_rejections: 5,
        };
        assert_eq!(stats.rejected(), 6);
        assert!((stats.acceptance_rate() - 0.4).abs() < f64::EPSILON);
        assert_eq!(GenerationStats::default().acceptance_rate(), 0.0);
    }
}
