use std::fmt::{Display, Formatter};
use surge::strategy::StrategyKind;
use crate::orchestrator::{Report, Sweep};
use crate::rate::Rate;

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let result = &self.result;
        let memory = match &self.memory {
            Some(memory) => format!("{:.2} MiB", memory.delta() as f64 / (1024.0 * 1024.0)),
            None => "-".to_owned(),
        };
        write!(
            f,
            "|{:<40}|{:>13}|{:>12}|{:>14}|{:>12}|{:>14}|",
            result.strategy_name(),
            format!("{}/{}", result.completed(), result.submitted()),
            result.duration().as_millis(),
            Rate(result.throughput()),
            result.contexts(),
            memory,
        )?;
        if let Some(failure) = &self.failure {
            write!(f, " failed: {failure}")?;
        } else if result.is_partial() {
            write!(f, " timed out")?;
        }
        Ok(())
    }
}

pub struct Separator();

impl Display for Separator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "|{:->40}|{:->13}|{:->12}|{:->14}|{:->12}|{:->14}|", "", "", "", "", "", "")
    }
}

pub struct Header();

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "|{:<40}|{:>13}|{:>12}|{:>14}|{:>12}|{:>14}|",
            "strategy", "completed", "elapsed (ms)", "throughput", "contexts", "memory delta"
        )
    }
}

/// The idealised wall time of every run in a sweep: one delay when every unit
/// can suspend at once, one delay per wave of units when contexts are capped.
pub struct Theory<'a>(pub &'a Sweep);

impl Display for Theory<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sweep = self.0;
        writeln!(f, "per-unit delay {:?}, timeout {:?}", sweep.delay, sweep.timeout)?;
        for run in &sweep.runs {
            let waves = match (run.spec.kind(), run.spec.capacity()) {
                (StrategyKind::Bounded, Some(capacity)) => run.units.div_ceil(capacity.get()),
                _ => usize::from(run.units > 0),
            };
            let ideal = sweep.delay.saturating_mul(u32::try_from(waves).unwrap_or(u32::MAX));
            writeln!(
                f,
                "  {:<40} {:>6} units, ideal {} ms",
                run.spec.label(&sweep.strategy_opts),
                run.units,
                ideal.as_millis()
            )?;
        }
        Ok(())
    }
}

pub struct Summary();

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "observations:")?;
        writeln!(f, "  lightweight tasks suspend without holding a thread, so the whole batch waits side by side")?;
        writeln!(f, "  task creation is cheap; thousands cost little more than their futures")?;
        writeln!(f, "  a bounded pool caps throughput at capacity / delay and queues the rest")?;
        writeln!(f, "  a thread per unit matches lightweight tasks on time but pays a stack per unit")?;
        write!(f, "  context switching between many OS threads adds overhead as unit counts grow")
    }
}
