/*!
The observer protocol: read-only hooks invoked before each reduction step
*/

use super::{Interpreter, Stack};
use crate::term::Kind;

/// A read-only witness to evaluation. Implementations must not mutate the stack; `notify` is
/// called once per reduction step, before the step is taken.
pub trait Observer {
    /// Called once, when the observer is registered with an interpreter
    fn setup(&mut self, _interpreter: &Interpreter) {}
    /// Called once, before the first step of a run
    fn init(&mut self) {}
    /// Called before every step
    fn notify(&mut self, _stack: &Stack) {}
}

/// Counts every reduction step, including internal bookkeeping nodes (`Union`, `Merge`,
/// `Projection`, `Composition`, `Recursion`, `In`)
#[derive(Debug, Default)]
pub struct StepCounter {
    steps: usize,
}

impl StepCounter {
    /// The number of steps observed since the last `init`
    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl Observer for StepCounter {
    fn init(&mut self) {
        self.steps = 0;
    }

    fn notify(&mut self, _stack: &Stack) {
        self.steps += 1;
    }
}

/// Counts only steps whose top node is a true primitive (`EmptySet`, `UnionPlus`, `IfThenElse`),
/// filtering out the bookkeeping rewrites (`Projection`, `Composition`, `In`, `Recursion`, ...)
#[derive(Debug, Default)]
pub struct AtomicStepCounter {
    steps: usize,
}

impl AtomicStepCounter {
    /// The number of primitive steps observed since the last `init`
    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl Observer for AtomicStepCounter {
    fn init(&mut self) {
        self.steps = 0;
    }

    fn notify(&mut self, stack: &Stack) {
        let top = stack.peek();
        if let Some(node) = top.lazy_node() {
            if matches!(
                node.kind(),
                Kind::EmptySet | Kind::UnionPlus | Kind::IfThenElse
            ) {
                self.steps += 1;
            }
        }
    }
}

/// Renders the stack (top to bottom) to stderr before each step; built on [`StepCounter`]
#[derive(Debug, Default)]
pub struct Debugger {
    counter: StepCounter,
}

impl Observer for Debugger {
    fn init(&mut self) {
        self.counter.init();
    }

    fn notify(&mut self, stack: &Stack) {
        self.counter.notify(stack);
        eprintln!("Step {}", self.counter.steps());
        for (i, expression) in stack.iter().enumerate().rev() {
            eprintln!("{:>4}  {}", i, expression);
        }
        eprintln!();
    }
}

/// Like [`Debugger`], but blocks on stdin between steps. Only meaningful in an interactive
/// binary; not exercised by the test suite.
#[derive(Debug, Default)]
pub struct StepByStep {
    debugger: Debugger,
}

impl Observer for StepByStep {
    fn init(&mut self) {
        self.debugger.init();
    }

    fn notify(&mut self, stack: &Stack) {
        self.debugger.notify(stack);
        let mut line = String::new();
        eprint!("Press enter to continue ");
        let _ = std::io::stdin().read_line(&mut line);
    }
}
