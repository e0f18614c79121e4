// File: src/core/topology.rs
use std::fmt;

const SELF_LOOP_PROB: f64 = 0.75;
const FORWARD_PROB: f64 = 0.25;

/// One HMM state. Emitting states carry a pdf class; the closing state of an
/// entry has neither pdf class nor transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct HmmState {
    pub index: usize,
    pub pdf_class: Option<usize>,
    pub transitions: Vec<(usize, f64)>,
}

impl HmmState {
    fn emitting(index: usize, transitions: Vec<(usize, f64)>) -> Self {
        Self {
            index,
            pdf_class: Some(index),
            transitions,
        }
    }

    fn terminal(index: usize) -> Self {
        Self {
            index,
            pdf_class: None,
            transitions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopologyEntry {
    pub phones: Vec<String>,
    pub states: Vec<HmmState>,
}

impl TopologyEntry {
    /// Left-to-right chain: each emitting state loops on itself or moves on.
    pub fn linear(phones: Vec<String>, num_states: usize) -> Self {
        let mut states: Vec<HmmState> = (0..num_states)
            .map(|s| HmmState::emitting(s, vec![(s, SELF_LOOP_PROB), (s + 1, FORWARD_PROB)]))
            .collect();
        states.push(HmmState::terminal(num_states));
        Self { phones, states }
    }

    /// Silence model: the first state fans out to every emitting state but the
    /// last, the middle states fan out to every emitting state but the first,
    /// and the last emitting state loops or exits. `num_states` must be >= 2.
    pub fn silence(phones: Vec<String>, num_states: usize) -> Self {
        let last = num_states - 1;
        let fan_out = 1.0 / last as f64;
        let states = (0..num_states)
            .map(|s| {
                let transitions = if s == 0 {
                    (0..last).map(|t| (t, fan_out)).collect()
                } else if s == last {
                    vec![(last, SELF_LOOP_PROB), (num_states, FORWARD_PROB)]
                } else {
                    (1..num_states).map(|t| (t, fan_out)).collect()
                };
                HmmState::emitting(s, transitions)
            })
            .chain(std::iter::once(HmmState::terminal(num_states)))
            .collect();
        Self { phones, states }
    }
}

/// The HMM templates for nonsilence and silence phones, in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    pub entries: Vec<TopologyEntry>,
}

impl Topology {
    pub fn new(
        nonsilence: Vec<String>,
        num_nonsil_states: usize,
        silence: Vec<String>,
        num_sil_states: usize,
    ) -> Self {
        Self {
            entries: vec![
                TopologyEntry::linear(nonsilence, num_nonsil_states),
                TopologyEntry::silence(silence, num_sil_states),
            ],
        }
    }
}

/// Renders a probability the way the toolkit's reference scripts print
/// floats: shortest round-trip digits, integral values keep a `.0`.
pub fn format_prob(p: f64) -> String {
    if p.fract() == 0.0 && p.is_finite() {
        format!("{:.1}", p)
    } else {
        format!("{}", p)
    }
}

impl fmt::Display for HmmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<State> {}", self.index)?;
        if let Some(pdf) = self.pdf_class {
            write!(f, " <PdfClass> {}", pdf)?;
        }
        for (target, prob) in &self.transitions {
            write!(f, " <Transition> {} {}", target, format_prob(*prob))?;
        }
        f.write_str(" </State>")
    }
}

impl fmt::Display for TopologyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<TopologyEntry>")?;
        writeln!(f, "<ForPhones>")?;
        writeln!(f, "{}", self.phones.join(" "))?;
        writeln!(f, "</ForPhones>")?;
        for state in &self.states {
            writeln!(f, "{}", state)?;
        }
        writeln!(f, "</TopologyEntry>")
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<Topology>")?;
        for entry in &self.entries {
            write!(f, "{}", entry)?;
        }
        writeln!(f, "</Topology>")
    }
}
