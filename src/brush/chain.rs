//! Ordered stage pipeline

use std::fmt;
use std::sync::Arc;

use crate::core::Result;
use crate::player::Sniper;
use crate::world::World;
use super::stage::{ExecutionResult, Stage};
use super::vars::BrushVars;

/// Stages run in series for every snipe
#[derive(Clone, Default)]
pub struct BrushChain {
    name: String,
    stages: Vec<Arc<dyn Stage>>,
}

impl BrushChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stages(stages: Vec<Arc<dyn Stage>>) -> Self {
        let mut chain = Self::new();
        for stage in stages {
            chain.chain(stage);
        }
        chain
    }

    /// Append a stage
    pub fn chain(&mut self, stage: Arc<dyn Stage>) {
        if !self.name.is_empty() {
            self.name.push(' ');
        }
        self.name.push_str(stage.name());
        self.stages.push(stage);
    }

    /// Stage names separated by spaces
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stages(&self) -> &[Arc<dyn Stage>] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage in order until one aborts or fails
    pub fn run(&self, sniper: &mut dyn Sniper, world: &dyn World, vars: &mut BrushVars) -> Result<ExecutionResult> {
        for stage in &self.stages {
            log::trace!("{}: running stage '{}'", sniper.name(), stage.name());
            if stage.run(sniper, world, vars)? == ExecutionResult::Abort {
                log::debug!("{}: chain '{}' aborted at '{}'", sniper.name(), self.name, stage.name());
                return Ok(ExecutionResult::Abort);
            }
        }
        Ok(ExecutionResult::Continue)
    }
}

impl fmt::Debug for BrushChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrushChain").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use crate::brush::stage::BrushPartType;
    use crate::brush::vars::Scope;
    use crate::core::Error;
    use crate::player::{BufferSink, Player};
    use crate::world::MemoryWorld;

    struct Recorder {
        name: &'static str,
        outcome: Option<ExecutionResult>,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Stage for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn kind(&self) -> BrushPartType {
            BrushPartType::Misc
        }

        fn run(&self, _sniper: &mut dyn Sniper, _world: &dyn World, vars: &mut BrushVars) -> Result<ExecutionResult> {
            self.calls.lock().unwrap().push(self.name);
            vars.set(Scope::Runtime, self.name, true);
            self.outcome.ok_or_else(|| Error::UnknownWorld("nowhere".to_string()))
        }
    }

    fn stage(name: &'static str, outcome: Option<ExecutionResult>, calls: &Arc<Mutex<Vec<&'static str>>>) -> Arc<dyn Stage> {
        Arc::new(Recorder { name, outcome, calls: Arc::clone(calls) })
    }

    #[test]
    fn test_runs_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = BrushChain::from_stages(vec![
            stage("a", Some(ExecutionResult::Continue), &calls),
            stage("b", Some(ExecutionResult::Continue), &calls),
        ]);
        assert_eq!(chain.name(), "a b");

        let mut player = Player::new("alice", "w", 5, Box::new(BufferSink::new()));
        let world = MemoryWorld::new();
        let mut vars = BrushVars::new();
        let result = chain.run(&mut player, &world, &mut vars).unwrap();
        assert_eq!(result, ExecutionResult::Continue);
        assert_eq!(*calls.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_abort_stops_chain_and_keeps_writes() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = BrushChain::from_stages(vec![
            stage("a", Some(ExecutionResult::Abort), &calls),
            stage("b", Some(ExecutionResult::Continue), &calls),
        ]);

        let mut player = Player::new("alice", "w", 5, Box::new(BufferSink::new()));
        let world = MemoryWorld::new();
        let mut vars = BrushVars::new();
        let result = chain.run(&mut player, &world, &mut vars).unwrap();
        assert_eq!(result, ExecutionResult::Abort);
        assert_eq!(*calls.lock().unwrap(), vec!["a"]);
        assert!(vars.has("a"));
        assert!(!vars.has("b"));
    }

    #[test]
    fn test_error_propagates() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = BrushChain::from_stages(vec![stage("broken", None, &calls)]);

        let mut player = Player::new("alice", "w", 5, Box::new(BufferSink::new()));
        let world = MemoryWorld::new();
        let mut vars = BrushVars::new();
        assert!(chain.run(&mut player, &world, &mut vars).is_err());
    }

    #[test]
    fn test_empty_chain_continues() {
        let chain = BrushChain::new();
        let mut player = Player::new("alice", "w", 5, Box::new(BufferSink::new()));
        let world = MemoryWorld::new();
        let mut vars = BrushVars::new();
        assert!(chain.is_empty());
        assert_eq!(chain.run(&mut player, &world, &mut vars).unwrap(), ExecutionResult::Continue);
    }
}
