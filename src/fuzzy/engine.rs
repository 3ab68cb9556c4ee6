//! Mamdani fuzzy inference for the adaptive green-extension decision.
//!
//! Two linguistic inputs (`Arrival`, the flow measured on the green lane;
//! `Queue`, the flow measured on the red lane) drive a 16-rule base whose
//! consequent is a green-extension amount in ticks. Inference follows the
//! textbook Mamdani pipeline: fuzzify both inputs, take the rule's firing
//! strength as the min of its two antecedent memberships, clip each
//! consequent membership function at that strength, aggregate by taking the
//! pointwise max across all 16 clipped outputs, then defuzzify by centroid
//! over a discrete sampling of the output universe.
//!
//! The rule base is built once into a static lookup table rather than
//! reconstructed per call, since it never changes at runtime.

use super::membership::triangular;
use lazy_static::lazy_static;

/// Linguistic terms over the Arrival universe `[0, 15]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrivalTerm {
    AlmostNone,
    Few,
    Many,
    TooMany,
}

impl ArrivalTerm {
    const ALL: [ArrivalTerm; 4] =
        [ArrivalTerm::AlmostNone, ArrivalTerm::Few, ArrivalTerm::Many, ArrivalTerm::TooMany];

    fn vertices(self) -> (f64, f64, f64) {
        match self {
            ArrivalTerm::AlmostNone => (0.0, 0.0, 2.0),
            ArrivalTerm::Few => (1.0, 4.0, 7.0),
            ArrivalTerm::Many => (5.0, 9.0, 13.0),
            ArrivalTerm::TooMany => (10.0, 15.0, 15.0),
        }
    }

    fn membership(self, x: f64) -> f64 {
        let (a, b, c) = self.vertices();
        triangular(x, a, b, c)
    }
}

/// Linguistic terms over the Queue universe `[0, 15]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueueTerm {
    VeryShort,
    Short,
    Medium,
    Long,
}

impl QueueTerm {
    const ALL: [QueueTerm; 4] = [QueueTerm::VeryShort, QueueTerm::Short, QueueTerm::Medium, QueueTerm::Long];

    fn vertices(self) -> (f64, f64, f64) {
        match self {
            QueueTerm::VeryShort => (0.0, 0.0, 2.0),
            QueueTerm::Short => (1.0, 4.0, 7.0),
            QueueTerm::Medium => (5.0, 9.0, 13.0),
            QueueTerm::Long => (10.0, 15.0, 15.0),
        }
    }

    fn membership(self, x: f64) -> f64 {
        let (a, b, c) = self.vertices();
        triangular(x, a, b, c)
    }
}

/// Linguistic terms over the Extension universe `[0, 6]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtensionTerm {
    Zero,
    Short,
    Medium,
    Long,
}

impl ExtensionTerm {
    fn vertices(self) -> (f64, f64, f64) {
        match self {
            ExtensionTerm::Zero => (0.0, 0.0, 2.0),
            ExtensionTerm::Short => (0.0, 2.0, 4.0),
            ExtensionTerm::Medium => (2.0, 4.0, 6.0),
            ExtensionTerm::Long => (4.0, 6.0, 6.0),
        }
    }

    fn membership(self, y: f64) -> f64 {
        let (a, b, c) = self.vertices();
        triangular(y, a, b, c)
    }
}

struct Rule {
    arrival: ArrivalTerm,
    queue: QueueTerm,
    consequence: ExtensionTerm,
}

lazy_static! {
    /// The 4x4 rule base: arrival increases the extension, queue suppresses it.
    static ref RULES: Vec<Rule> = vec![
        Rule { arrival: ArrivalTerm::AlmostNone, queue: QueueTerm::VeryShort, consequence: ExtensionTerm::Zero },
        Rule { arrival: ArrivalTerm::AlmostNone, queue: QueueTerm::Short, consequence: ExtensionTerm::Zero },
        Rule { arrival: ArrivalTerm::AlmostNone, queue: QueueTerm::Medium, consequence: ExtensionTerm::Zero },
        Rule { arrival: ArrivalTerm::AlmostNone, queue: QueueTerm::Long, consequence: ExtensionTerm::Zero },

        Rule { arrival: ArrivalTerm::Few, queue: QueueTerm::VeryShort, consequence: ExtensionTerm::Short },
        Rule { arrival: ArrivalTerm::Few, queue: QueueTerm::Short, consequence: ExtensionTerm::Short },
        Rule { arrival: ArrivalTerm::Few, queue: QueueTerm::Medium, consequence: ExtensionTerm::Zero },
        Rule { arrival: ArrivalTerm::Few, queue: QueueTerm::Long, consequence: ExtensionTerm::Zero },

        Rule { arrival: ArrivalTerm::Many, queue: QueueTerm::VeryShort, consequence: ExtensionTerm::Medium },
        Rule { arrival: ArrivalTerm::Many, queue: QueueTerm::Short, consequence: ExtensionTerm::Medium },
        Rule { arrival: ArrivalTerm::Many, queue: QueueTerm::Medium, consequence: ExtensionTerm::Short },
        Rule { arrival: ArrivalTerm::Many, queue: QueueTerm::Long, consequence: ExtensionTerm::Zero },

        Rule { arrival: ArrivalTerm::TooMany, queue: QueueTerm::VeryShort, consequence: ExtensionTerm::Long },
        Rule { arrival: ArrivalTerm::TooMany, queue: QueueTerm::Short, consequence: ExtensionTerm::Medium },
        Rule { arrival: ArrivalTerm::TooMany, queue: QueueTerm::Medium, consequence: ExtensionTerm::Medium },
        Rule { arrival: ArrivalTerm::TooMany, queue: QueueTerm::Long, consequence: ExtensionTerm::Short },
    ];
}

const OUTPUT_UNIVERSE: [f64; 7] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];

/// Computes the green-extension recommendation, in ticks, for the given
/// queue and arrival measurements. Both inputs are clamped to `[0, 15]`
/// before fuzzification; the result is a real number in `[0, 6]` that the
/// caller rounds and caps.
pub fn extension(queue: f64, arrival: f64) -> f64 {
    let queue = queue.clamp(0.0, 15.0);
    let arrival = arrival.clamp(0.0, 15.0);

    let mut aggregated = [0.0_f64; OUTPUT_UNIVERSE.len()];
    for rule in RULES.iter() {
        let firing = rule.arrival.membership(arrival).min(rule.queue.membership(queue));
        if firing <= 0.0 {
            continue;
        }
        for (i, &y) in OUTPUT_UNIVERSE.iter().enumerate() {
            let clipped = firing.min(rule.consequence.membership(y));
            if clipped > aggregated[i] {
                aggregated[i] = clipped;
            }
        }
    }

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, &y) in OUTPUT_UNIVERSE.iter().enumerate() {
        numerator += y * aggregated[i];
        denominator += aggregated[i];
    }

    if denominator == 0.0 { 0.0 } else { numerator / denominator }
}
