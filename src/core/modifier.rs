//! Chained multiplicative modifiers.
//!
//! Multipliers are fixed-point on a 4096 scale, the same resolution the damage
//! formula works at. Every step rounds half-up before the next multiplier is
//! applied, so the order in which adjustments are pushed changes the result.

use serde::{Deserialize, Serialize};
use std::fmt;

const SCALE: i64 = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifier(u32);

impl Modifier {
    pub const IDENTITY: Modifier = Modifier(4096);
    pub const HALF: Modifier = Modifier(2048);
    pub const QUARTER: Modifier = Modifier(1024);
    pub const ONE_AND_HALF: Modifier = Modifier(6144);
    pub const DOUBLE: Modifier = Modifier(8192);

    pub const fn from_raw(raw: u32) -> Self {
        Modifier(raw)
    }

    pub fn from_f64(multiplier: f64) -> Self {
        let raw = (multiplier.max(0.0) * SCALE as f64).round();
        Modifier(raw.min(u32::MAX as f64) as u32)
    }

    /// Ratio helper for content that thinks in fractions (`1/16`, `3/2`).
    pub fn ratio(numerator: u32, denominator: u32) -> Self {
        if denominator == 0 {
            return Modifier(0);
        }
        let raw = (numerator as u64 * SCALE as u64 + denominator as u64 / 2) / denominator as u64;
        Modifier(raw.min(u32::MAX as u64) as u32)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    /// One chain step: multiply, round half-up, clamp at zero.
    pub fn apply(self, value: i64) -> i64 {
        let scaled = value.saturating_mul(self.0 as i64);
        let rounded = scaled.saturating_add(SCALE / 2).div_euclid(SCALE);
        rounded.max(0)
    }
}

impl Default for Modifier {
    fn default() -> Self {
        Modifier::IDENTITY
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.as_f64())
    }
}

/// One entry in a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adjustment {
    Multiply(Modifier),
    Override(i64),
}

/// A running value with the adjustments applied so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModifierChain {
    base: i64,
    value: i64,
    steps: usize,
    overridden: bool,
    signed: bool,
}

impl ModifierChain {
    pub fn new(base: i64) -> Self {
        Self {
            base,
            value: base,
            steps: 0,
            overridden: false,
            signed: false,
        }
    }

    /// A chain whose set and override values may go below zero (move priority).
    pub fn signed(base: i64) -> Self {
        Self {
            signed: true,
            ..Self::new(base)
        }
    }

    fn floor(&self, value: i64) -> i64 {
        if self.signed {
            value
        } else {
            value.max(0)
        }
    }

    /// Applies all adjustments in order. An override ends the chain.
    pub fn apply(base: i64, adjustments: &[Adjustment]) -> i64 {
        let mut chain = Self::new(base);
        for adjustment in adjustments {
            if !chain.push(*adjustment) {
                break;
            }
        }
        chain.value()
    }

    /// Returns false once the chain is closed by an override.
    pub fn push(&mut self, adjustment: Adjustment) -> bool {
        if self.overridden {
            return false;
        }
        self.steps += 1;
        match adjustment {
            Adjustment::Multiply(modifier) => {
                self.value = modifier.apply(self.value);
                true
            }
            Adjustment::Override(value) => {
                self.value = self.floor(value);
                self.overridden = true;
                false
            }
        }
    }

    /// Replaces the running value without closing the chain.
    pub fn set(&mut self, value: i64) {
        if !self.overridden {
            self.value = self.floor(value);
            self.steps += 1;
        }
    }

    pub fn base(&self) -> i64 {
        self.base
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_overridden(&self) -> bool {
        self.overridden
    }
}
