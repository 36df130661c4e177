use std::collections::HashMap;

use crate::{
    environment::prelude::{Environment, FrameId, Routine, Value},
    lexer::prelude::Token,
    parser::prelude::{
        BinaryExpression, Expression, ForLoop, FunctionCall, Program, RoutineDeclaration,
        Statement
    },
    profiler::prelude::Profiler,
    utils::prelude::SrcSpan
};

use super::error::{RuntimeError, RuntimeErrorType};

/// How a statement finished.
///
/// `Returned` travels up through every block until the enclosing routine
/// call takes it. `Broke` and `Continued` are consumed by the nearest loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Returned(Value),
    Broke,
    Continued,
}

/// Tree-walking interpreter over one long-lived session.
///
/// The global frame, usage counters and the profiler survive between calls
/// to [`Interpreter::interpret`], so a REPL can feed it one program at a time.
#[derive(Debug)]
pub struct Interpreter {
    env: Environment,
    usage: HashMap<String, usize>,
    // declaration order, breaks ties between equal counters
    usage_order: Vec<String>,
    execution_priority: Option<String>,
    profiler: Profiler,
    call_depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_profiler(Profiler::new())
    }

    pub fn with_profiler(profiler: Profiler) -> Self {
        Self {
            env: Environment::new(),
            usage: HashMap::new(),
            usage_order: vec![],
            execution_priority: None,
            profiler,
            call_depth: 0,
        }
    }

    pub fn interpret(&mut self, program: &Program) -> Result<(), RuntimeError> {
        let global = self.env.global();

        for statement in &program.statements {
            match self.execute(statement, global)? {
                Flow::Returned(_) => {
                    return Err(RuntimeError::new(
                        RuntimeErrorType::ReturnOutsideRoutine,
                        statement.location()
                    ));
                },
                Flow::Normal | Flow::Broke | Flow::Continued => {}
            }

            self.update_priority();
        }

        Ok(())
    }

    /// Calls per routine name, in declaration order.
    pub fn function_usage(&self) -> Vec<(&str, usize)> {
        self.usage_order.iter()
            .map(|name| (name.as_str(), self.usage.get(name).copied().unwrap_or_default()))
            .collect()
    }

    pub fn usage_of(&self, name: &str) -> Option<usize> {
        self.usage.get(name).copied()
    }

    pub fn execution_priority(&self) -> Option<&str> {
        self.execution_priority.as_deref()
    }

    pub fn profiler(&self) -> &Profiler {
        &self.profiler
    }

    pub fn global(&self, name: &str) -> Option<&Value> {
        self.env.get(self.env.global(), name).ok()
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    fn execute(&mut self, statement: &Statement, frame: FrameId) -> Result<Flow, RuntimeError> {
        match statement {
            Statement::VariableDeclaration(decl) => {
                let value = self.evaluate(&decl.value, frame)?;

                tracing::trace!(name = %decl.name, %value, "declare");
                self.profiler.log_details("declare", format!("{} = {value}", decl.name));

                self.env.declare(frame, decl.name.name.clone(), value)
                    .map_err(|err| RuntimeError::new(err, decl.name.location))?;

                Ok(Flow::Normal)
            },
            Statement::RoutineDeclaration(decl) => {
                self.declare_routine(decl, frame)?;

                Ok(Flow::Normal)
            },
            Statement::ForLoop(loop_) => self.execute_loop(loop_, frame),
            Statement::Return(ret) => {
                if self.call_depth == 0 {
                    return Err(RuntimeError::new(RuntimeErrorType::ReturnOutsideRoutine, ret.location));
                }

                let value = self.evaluate(&ret.value, frame)?;
                self.profiler.log_details("return", value.to_string());

                Ok(Flow::Returned(value))
            },
            Statement::Expression(expression) => {
                let _ = self.evaluate(expression, frame)?;

                Ok(Flow::Normal)
            }
        }
    }

    fn execute_statements(&mut self, statements: &[Statement], frame: FrameId) -> Result<Flow, RuntimeError> {
        for statement in statements {
            let flow = self.execute(statement, frame)?;

            if flow != Flow::Normal {
                return Ok(flow);
            }
        }

        Ok(Flow::Normal)
    }

    fn execute_block(&mut self, statements: &[Statement], parent: FrameId) -> Result<Flow, RuntimeError> {
        self.with_frame(parent, |this, frame| this.execute_statements(statements, frame))
    }

    /// Runs `f` in a fresh child of `parent`, releasing the frame afterwards
    /// whether or not `f` failed.
    fn with_frame<R>(
        &mut self,
        parent: FrameId,
        f: impl FnOnce(&mut Self, FrameId) -> Result<R, RuntimeError>
    ) -> Result<R, RuntimeError> {
        let frame = self.env.push(parent);
        let result = f(self, frame);
        self.env.release(frame);

        result
    }

    fn declare_routine(&mut self, decl: &RoutineDeclaration, frame: FrameId) -> Result<(), RuntimeError> {
        let name = decl.name.name.clone();

        let routine = Routine {
            name: name.clone(),
            params: decl.params.iter().map(|param| param.name.clone()).collect(),
            body: decl.body.clone().into(),
            env: frame,
        };

        self.env.declare(frame, name.clone(), Value::Routine(routine))
            .map_err(|err| RuntimeError::new(err, decl.name.location))?;
        self.env.capture(frame);

        tracing::trace!(%name, params = decl.params.len(), "routine");
        self.profiler.log_details("routine", name.clone());

        if self.usage.insert(name.clone(), 0).is_none() {
            self.usage_order.push(name);
        }

        Ok(())
    }

    fn execute_loop(&mut self, loop_: &ForLoop, frame: FrameId) -> Result<Flow, RuntimeError> {
        self.with_frame(frame, |this, loop_frame| {
            if let Flow::Returned(value) = this.execute(&loop_.initializer, loop_frame)? {
                return Ok(Flow::Returned(value));
            }

            let mut iterations = 0usize;

            while this.evaluate(&loop_.condition, loop_frame)?.is_truthy() {
                iterations += 1;
                tracing::trace!(iteration = iterations, "loop");

                match this.execute_block(&loop_.body, loop_frame)? {
                    Flow::Returned(value) => return Ok(Flow::Returned(value)),
                    Flow::Broke => break,
                    Flow::Continued | Flow::Normal => {}
                }

                if let Flow::Returned(value) = this.execute(&loop_.increment, loop_frame)? {
                    return Ok(Flow::Returned(value));
                }
            }

            this.profiler.log_details("loop", format!("{iterations} iterations"));

            Ok(Flow::Normal)
        })
    }

    fn evaluate(&mut self, expression: &Expression, frame: FrameId) -> Result<Value, RuntimeError> {
        match expression {
            Expression::Number(number) => Ok(Value::from(number.value)),
            Expression::Identifier(ident) => self.env.get(frame, &ident.name)
                .cloned()
                .map_err(|err| RuntimeError::new(err, ident.location)),
            Expression::Assignment(assignment) => {
                let value = self.evaluate(&assignment.value, frame)?;

                self.env.assign(frame, &assignment.name.name, value.clone())
                    .map_err(|err| RuntimeError::new(err, assignment.name.location))?;
                self.profiler.log_details("assign", format!("{} = {value}", assignment.name));

                Ok(value)
            },
            Expression::Binary(binary) => {
                let left = self.evaluate(&binary.left, frame)?;
                let right = self.evaluate(&binary.right, frame)?;

                apply_operator(binary, left, right)
            },
            Expression::FunctionCall(call) => self.call(call, frame)
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(routine = %call.name))]
    fn call(&mut self, call: &FunctionCall, frame: FrameId) -> Result<Value, RuntimeError> {
        let routine = match self.env.get(frame, &call.name.name) {
            Ok(Value::Routine(routine)) => routine.clone(),
            _ => {
                return Err(RuntimeError::new(
                    RuntimeErrorType::UndefinedRoutine { name: call.name.name.clone() },
                    call.name.location
                ));
            }
        };

        let mut arguments = Vec::with_capacity(call.arguments.len());

        for argument in &call.arguments {
            arguments.push(self.evaluate(argument, frame)?);
        }

        self.bump_usage(&routine.name);

        let printed = arguments.iter()
            .map(|arg| arg.to_string())
            .collect::<Vec<String>>();
        self.profiler.log_details("call", format!("{}[{}]", routine.name, printed.join(", ")));

        // missing arguments leave their parameters unbound, extra ones are dropped
        self.call_depth += 1;
        let result = self.with_frame(routine.env, |this, call_frame| {
            for (param, argument) in routine.params.iter().zip(arguments) {
                this.env.declare(call_frame, param.clone(), argument)
                    .map_err(|err| RuntimeError::new(err, call.location))?;
            }

            this.execute_statements(&routine.body, call_frame)
        });
        self.call_depth -= 1;

        match result? {
            Flow::Returned(value) => Ok(value),
            Flow::Normal | Flow::Broke | Flow::Continued => Ok(Value::Nothing)
        }
    }

    fn bump_usage(&mut self, name: &str) {
        match self.usage.get_mut(name) {
            Some(count) => *count += 1,
            None => {
                let _ = self.usage.insert(name.to_string(), 1);
                self.usage_order.push(name.to_string());
            }
        }
    }

    fn update_priority(&mut self) {
        let mut top: Option<(&String, usize)> = None;

        for name in &self.usage_order {
            let count = self.usage.get(name).copied().unwrap_or_default();

            if count > top.map_or(0, |(_, max)| max) {
                top = Some((name, count));
            }
        }

        let priority = top.map(|(name, _)| name.clone());

        if priority != self.execution_priority {
            tracing::debug!(priority = ?priority, "execution priority changed");

            if let Some(name) = &priority {
                self.profiler.log_details("priority", name.clone());
            }

            self.execution_priority = priority;
        }
    }
}

fn apply_operator(binary: &BinaryExpression, left: Value, right: Value) -> Result<Value, RuntimeError> {
    let operator = &binary.operator;

    if !operator.is_additive() && !operator.is_multiplicative() {
        return Err(RuntimeError::new(
            RuntimeErrorType::UnknownOperator { operator: operator.clone() },
            binary.location
        ));
    }

    let (lhs, rhs) = match (left.as_number(), right.as_number()) {
        (Some(lhs), Some(rhs)) => (lhs, rhs),
        (None, _) => return invalid_operand(operator, &left, binary.left.location()),
        (_, None) => return invalid_operand(operator, &right, binary.right.location())
    };

    let value = match operator {
        Token::Plus => Value::from(lhs + rhs),
        Token::Minus => Value::from(lhs - rhs),
        Token::Mult => Value::from(lhs * rhs),
        Token::Div => Value::from(lhs / rhs),
        Token::LessThan => Value::from(lhs < rhs),
        Token::GreaterThan => Value::from(lhs > rhs),
        Token::LessThanOrEqual => Value::from(lhs <= rhs),
        Token::GreaterThanOrEqual => Value::from(lhs >= rhs),
        _ => {
            return Err(RuntimeError::new(
                RuntimeErrorType::UnknownOperator { operator: operator.clone() },
                binary.location
            ));
        }
    };

    Ok(value)
}

fn invalid_operand<T>(operator: &Token, value: &Value, location: SrcSpan) -> Result<T, RuntimeError> {
    Err(RuntimeError::new(
        RuntimeErrorType::InvalidOperand {
            operator: operator.clone(),
            value_type: value._type(),
        },
        location
    ))
}
