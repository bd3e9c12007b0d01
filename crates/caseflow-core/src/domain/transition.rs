use crate::domain::event::EventName;
use crate::domain::step::StepName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sentinel step name meaning "the case is closed"
pub const END: &str = "end";

/// Where a transition leads
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionTarget {
    /// Move the case to another step
    Step(StepName),

    /// Close the case
    End,
}

impl TransitionTarget {
    /// Parse a target name, mapping the `end` sentinel to [`TransitionTarget::End`]
    pub fn parse(name: &str) -> Self {
        if name == END {
            TransitionTarget::End
        } else {
            TransitionTarget::Step(StepName::from(name))
        }
    }

    /// Whether this target closes the case
    pub fn is_end(&self) -> bool {
        matches!(self, TransitionTarget::End)
    }
}

impl From<&str> for TransitionTarget {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<StepName> for TransitionTarget {
    fn from(value: StepName) -> Self {
        if value.as_str() == END {
            TransitionTarget::End
        } else {
            TransitionTarget::Step(value)
        }
    }
}

/// A single `(from, event) -> to` rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Step the case must be at
    pub from: StepName,

    /// Event that triggers the move
    pub event: EventName,

    /// Where the case goes
    pub to: TransitionTarget,
}

/// Deterministic mapping from `(from_step, event)` to a target.
///
/// Rules keep their declaration order; inserting an existing
/// `(from, event)` pair replaces its target in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionTable {
    transitions: Vec<Transition>,
}

impl TransitionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule, returning the target it replaced (if any)
    pub fn insert(
        &mut self,
        from: StepName,
        event: EventName,
        to: TransitionTarget,
    ) -> Option<TransitionTarget> {
        match self
            .transitions
            .iter_mut()
            .find(|t| t.from == from && t.event == event)
        {
            Some(existing) => Some(std::mem::replace(&mut existing.to, to)),
            None => {
                self.transitions.push(Transition { from, event, to });
                None
            }
        }
    }

    /// Look up the target for a step/event pair
    pub fn lookup(&self, from: &StepName, event: &EventName) -> Option<&TransitionTarget> {
        self.transitions
            .iter()
            .find(|t| &t.from == from && &t.event == event)
            .map(|t| &t.to)
    }

    /// Every event name referenced by the table
    pub fn event_names(&self) -> BTreeSet<EventName> {
        self.transitions.iter().map(|t| t.event.clone()).collect()
    }

    /// Rules leaving the given step
    pub fn from_step<'a>(
        &'a self,
        from: &'a StepName,
    ) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions.iter().filter(move |t| &t.from == from)
    }

    /// Iterate rules in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Whether the table has no rules
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(name: &str) -> StepName {
        StepName::from(name)
    }

    fn event(name: &str) -> EventName {
        EventName::from(name)
    }

    #[test]
    fn test_parse_end_sentinel() {
        assert_eq!(TransitionTarget::parse("end"), TransitionTarget::End);
        assert_eq!(
            TransitionTarget::parse("review"),
            TransitionTarget::Step(step("review"))
        );
        assert!(TransitionTarget::from(step("end")).is_end());
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut table = TransitionTable::new();
        assert!(table
            .insert(step("a"), event("go"), TransitionTarget::parse("b"))
            .is_none());

        assert_eq!(
            table.lookup(&step("a"), &event("go")),
            Some(&TransitionTarget::Step(step("b")))
        );
        assert!(table.lookup(&step("a"), &event("stop")).is_none());
        assert!(table.lookup(&step("b"), &event("go")).is_none());
    }

    #[test]
    fn test_insert_overwrites_existing_pair() {
        let mut table = TransitionTable::new();
        table.insert(step("a"), event("go"), TransitionTarget::parse("b"));
        table.insert(step("a"), event("other"), TransitionTarget::End);
        let replaced = table.insert(step("a"), event("go"), TransitionTarget::parse("c"));

        assert_eq!(replaced, Some(TransitionTarget::Step(step("b"))));
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.lookup(&step("a"), &event("go")),
            Some(&TransitionTarget::Step(step("c")))
        );
        // replaced rule keeps its original position
        assert_eq!(table.iter().next().map(|t| t.event.clone()), Some(event("go")));
    }

    #[test]
    fn test_event_names_are_deduplicated() {
        let mut table = TransitionTable::new();
        table.insert(step("a"), event("go"), TransitionTarget::parse("b"));
        table.insert(step("b"), event("go"), TransitionTarget::End);
        table.insert(step("b"), event("abort"), TransitionTarget::End);

        let names: Vec<_> = table.event_names().into_iter().collect();
        assert_eq!(names, vec![event("abort"), event("go")]);
        assert_eq!(table.from_step(&step("b")).count(), 2);
    }
}
