use crate::models::report::Advice;
use serde::{Deserialize, Serialize};

/// Numeric range with optional open/closed bounds on each side.
///
/// An interval without any bound contains every number. `NaN` is never
/// contained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Interval {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub above: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_least: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub below: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_most: Option<f64>,
}

impl Interval {
    pub fn above(value: f64) -> Self {
        Self {
            above: Some(value),
            ..Self::default()
        }
    }

    pub fn at_least(value: f64) -> Self {
        Self {
            at_least: Some(value),
            ..Self::default()
        }
    }

    pub fn below(value: f64) -> Self {
        Self {
            below: Some(value),
            ..Self::default()
        }
    }

    pub fn at_most(value: f64) -> Self {
        Self {
            at_most: Some(value),
            ..Self::default()
        }
    }

    /// Closed range `[low, high]`
    pub fn between(low: f64, high: f64) -> Self {
        Self::at_least(low).and_at_most(high)
    }

    pub fn and_below(mut self, value: f64) -> Self {
        self.below = Some(value);
        self
    }

    pub fn and_at_most(mut self, value: f64) -> Self {
        self.at_most = Some(value);
        self
    }

    pub fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }

        self.above.map_or(true, |bound| value > bound)
            && self.at_least.map_or(true, |bound| value >= bound)
            && self.below.map_or(true, |bound| value < bound)
            && self.at_most.map_or(true, |bound| value <= bound)
    }

    /// Reject NaN bounds, which would silently make the interval empty
    pub fn validate(&self) -> Result<(), String> {
        let bounds = [self.above, self.at_least, self.below, self.at_most];
        if bounds.iter().flatten().any(|bound| bound.is_nan()) {
            return Err("interval bound is NaN".to_string());
        }
        Ok(())
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(bound) = self.above {
            parts.push(format!("> {}", bound));
        }
        if let Some(bound) = self.at_least {
            parts.push(format!(">= {}", bound));
        }
        if let Some(bound) = self.below {
            parts.push(format!("< {}", bound));
        }
        if let Some(bound) = self.at_most {
            parts.push(format!("<= {}", bound));
        }

        if parts.is_empty() {
            write!(f, "any")
        } else {
            write!(f, "{}", parts.join(" and "))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeTier {
    pub when: Interval,
    pub advice: Advice,
}

/// Ordered threshold table: the first tier containing the value wins,
/// `otherwise` covers everything else (including undefined values).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeTable {
    #[serde(default)]
    pub tiers: Vec<GradeTier>,
    pub otherwise: Advice,
}

impl GradeTable {
    pub fn new(otherwise: Advice) -> Self {
        Self {
            tiers: Vec::new(),
            otherwise,
        }
    }

    pub fn tier(mut self, when: Interval, advice: Advice) -> Self {
        self.tiers.push(GradeTier { when, advice });
        self
    }

    pub fn grade(&self, value: f64) -> &Advice {
        self.tiers
            .iter()
            .find(|tier| tier.when.contains(value))
            .map(|tier| &tier.advice)
            .unwrap_or(&self.otherwise)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.tiers.iter().try_for_each(|tier| tier.when.validate())
    }
}

/// Pass/fail test for a per-frame boolean check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    PassWhen(Interval),
    FailWhen(Interval),
}

impl Criterion {
    pub fn passes(&self, value: f64) -> bool {
        match self {
            Criterion::PassWhen(interval) => interval.contains(value),
            Criterion::FailWhen(interval) => !interval.contains(value),
        }
    }

    pub fn interval(&self) -> &Interval {
        match self {
            Criterion::PassWhen(interval) | Criterion::FailWhen(interval) => interval,
        }
    }
}
