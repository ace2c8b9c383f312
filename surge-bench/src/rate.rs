use std::fmt::Display;
use std::fmt::Formatter;

/// Work units per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rate(pub f64);

impl Rate {
    pub fn per_sec(&self) -> f64 {
        self.0
    }

    pub fn kilo_per_sec(&self) -> f64 {
        self.0 / 1_000.0
    }
}

impl Display for Rate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let unaligned = match self.0 {
            val if val.is_infinite() => "∞ /s".to_owned(),
            val if val >= 10_000.0 => format!("{:.2} k/s", self.kilo_per_sec()),
            _ => format!("{:.1} /s", self.per_sec()),
        };
        f.pad(&unaligned)
    }
}
