use std::fmt::Display;

use crate::{
    lexer::prelude::{LexResult, Token},
    parser::prelude::{unexpected, Parse, ParseError, Parser},
    utils::prelude::SrcSpan
};

// program -> { <statement> } EOF
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Program {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let mut statements = vec![];

        while !parser.is(&Token::Eof) {
            statements.push(Statement::parse(parser)?);
        }

        Ok(Self {
            statements,
            location: SrcSpan { start: 0, end: parser.current_token.2 }
        })
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let statements = self.statements.iter()
            .map(|statement| statement.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}", statements.join("\n"))
    }
}

// statement -> <let> | <routine> | <for> | <return> | <identifier_statement> | <expression>
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    VariableDeclaration(VariableDeclaration),
    RoutineDeclaration(RoutineDeclaration),
    ForLoop(ForLoop),
    Return(ReturnStatement),
    Expression(Expression),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Statement {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let statement = match &parser.current_token.1 {
            Token::Let => Self::VariableDeclaration(VariableDeclaration::parse(parser)?),
            Token::Routine => Self::RoutineDeclaration(RoutineDeclaration::parse(parser)?),
            Token::For => Self::ForLoop(ForLoop::parse(parser)?),
            Token::Return => Self::Return(ReturnStatement::parse(parser)?),
            Token::Ident(_) => Self::parse_identifier_statement(parser)?,
            _ => Self::Expression(Expression::parse(parser)?)
        };

        Ok(statement)
    }
}

impl Statement {
    // identifier_statement -> <identifier> = <expression> | <identifier> * | <identifier> [ <args> ]
    fn parse_identifier_statement<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>
    ) -> Result<Self, ParseError> {
        let name = parser.expect_ident()?;

        let expression = match &parser.current_token.1 {
            Token::Assign => {
                parser.step();

                let value = Expression::parse(parser)?;
                let location = SrcSpan { start: name.location.start, end: value.location().end };

                Expression::Assignment(AssignmentExpression {
                    name,
                    value: Box::new(value),
                    location
                })
            },
            Token::Mult => {
                let (_, end) = parser.expect_one(Token::Mult)?;

                Expression::Assignment(AssignmentExpression::increment(name, end))
            },
            Token::LSBracket => Expression::FunctionCall(FunctionCall::parse_arguments(parser, name)?),
            _ => return unexpected(&parser.current_token, &["`=`", "`*`", "`[`"])
        };

        Ok(Self::Expression(expression))
    }

    pub fn location(&self) -> SrcSpan {
        match self {
            Self::VariableDeclaration(decl) => decl.location,
            Self::RoutineDeclaration(decl) => decl.location,
            Self::ForLoop(loop_) => loop_.location,
            Self::Return(ret) => ret.location,
            Self::Expression(expression) => expression.location()
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VariableDeclaration(decl) => write!(f, "{decl}"),
            Self::RoutineDeclaration(decl) => write!(f, "{decl}"),
            Self::ForLoop(loop_) => write!(f, "{loop_}"),
            Self::Return(ret) => write!(f, "{ret}"),
            Self::Expression(expression) => write!(f, "{expression}")
        }
    }
}

// block -> ^ { <statement> } ^
//
// The closing `^` is the next one left over after every nested statement
// consumed its own pair.
fn parse_block<T: Iterator<Item = LexResult>>(
    parser: &mut Parser<T>
) -> Result<(Vec<Statement>, u32), ParseError> {
    let _ = parser.expect_one(Token::Caret)?;

    let mut body = vec![];

    while !parser.is(&Token::Caret) {
        if parser.is(&Token::Eof) {
            return unexpected(&parser.current_token, &["a statement", "`^`"]);
        }

        body.push(Statement::parse(parser)?);
    }

    let (_, end) = parser.expect_one(Token::Caret)?;

    Ok((body, end))
}

fn write_block(f: &mut std::fmt::Formatter<'_>, body: &[Statement]) -> std::fmt::Result {
    write!(f, "^")?;

    for statement in body {
        write!(f, "\n    {statement}")?;
    }

    write!(f, "\n^")
}

// let -> let <identifier> = <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub name: Identifier,
    pub value: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for VariableDeclaration {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Let)?;

        let name = parser.expect_ident()?;
        let _ = parser.expect_one(Token::Assign)?;
        let value = Expression::parse(parser)?;

        let location = SrcSpan { start, end: value.location().end };

        Ok(Self {
            name,
            value,
            location
        })
    }
}

impl Display for VariableDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "let {} = {}", self.name, self.value)
    }
}

// routine -> routine <identifier> [ "[" <params> "]" ] <block>
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineDeclaration {
    pub name: Identifier,
    pub params: Vec<Identifier>,
    pub body: Vec<Statement>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for RoutineDeclaration {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Routine)?;

        let name = parser.expect_ident()?;
        let mut params = vec![];

        if parser.is(&Token::LSBracket) {
            parser.step();

            if !parser.is(&Token::RSBracket) {
                params.push(parser.expect_ident()?);

                while parser.is(&Token::Comma) {
                    parser.step();
                    params.push(parser.expect_ident()?);
                }
            }

            if !parser.is(&Token::RSBracket) {
                return unexpected(&parser.current_token, &["`,`", "`]`"]);
            }

            parser.step();
        }

        let (body, end) = parse_block(parser)?;

        Ok(Self {
            name,
            params,
            body,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for RoutineDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self.params.iter()
            .map(|param| param.to_string())
            .collect::<Vec<String>>();

        write!(f, "routine {} [{}] ", self.name, params.join(", "))?;
        write_block(f, &self.body)
    }
}

// for -> for "<" <statement> ; <expression> ; <statement> ">" <block>
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub initializer: Box<Statement>,
    pub condition: Expression,
    pub increment: Box<Statement>,
    pub body: Vec<Statement>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ForLoop {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::For)?;
        let _ = parser.expect_one(Token::LessThan)?;

        let initializer = Box::new(Statement::parse(parser)?);
        let _ = parser.expect_one(Token::Semicolon)?;

        let condition = Expression::parse(parser)?;
        let _ = parser.expect_one(Token::Semicolon)?;

        let increment = Box::new(Statement::parse(parser)?);
        let _ = parser.expect_one(Token::GreaterThan)?;

        let (body, end) = parse_block(parser)?;

        Ok(Self {
            initializer,
            condition,
            increment,
            body,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for ForLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "for <{}; {}; {}> ", self.initializer, self.condition, self.increment)?;
        write_block(f, &self.body)
    }
}

// return -> return <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ReturnStatement {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Return)?;

        let value = Expression::parse(parser)?;
        let location = SrcSpan { start, end: value.location().end };

        Ok(Self {
            value,
            location
        })
    }
}

impl Display for ReturnStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "return {}", self.value)
    }
}

// expression -> <term> { (+ | - | < | > | <= | >=) <term> }
// term       -> <factor> { (* | /) <factor> }
// factor     -> <number> | <identifier> [ * | "[" <args> "]" ]
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Assignment(AssignmentExpression),
    FunctionCall(FunctionCall),
    Binary(BinaryExpression),
    Identifier(Identifier),
    Number(NumberLiteral),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Expression {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let mut left = Self::parse_term(parser)?;

        while parser.current_token.1.is_additive() {
            let (_, operator, _) = parser.next_token();
            let right = Self::parse_term(parser)?;

            left = Self::Binary(BinaryExpression::new(left, operator, right));
        }

        Ok(left)
    }
}

impl Expression {
    fn parse_term<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>
    ) -> Result<Self, ParseError> {
        let mut left = Self::parse_factor(parser)?;

        while parser.current_token.1.is_multiplicative() {
            let (_, operator, _) = parser.next_token();
            let right = Self::parse_factor(parser)?;

            left = Self::Binary(BinaryExpression::new(left, operator, right));
        }

        Ok(left)
    }

    // An identifier directly followed by `*` is the increment sugar. The `*`
    // is consumed here, before `parse_term` can read it as multiplication.
    fn parse_factor<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>
    ) -> Result<Self, ParseError> {
        match &parser.current_token {
            (start, Token::Number(value), end) => {
                let literal = NumberLiteral {
                    value: *value,
                    location: SrcSpan { start: *start, end: *end }
                };

                parser.step();

                Ok(Self::Number(literal))
            },
            (_, Token::Ident(_), _) => {
                let name = parser.expect_ident()?;

                match parser.current_token.1 {
                    Token::Mult => {
                        let (_, end) = parser.expect_one(Token::Mult)?;

                        Ok(Self::Assignment(AssignmentExpression::increment(name, end)))
                    },
                    Token::LSBracket => Ok(Self::FunctionCall(FunctionCall::parse_arguments(parser, name)?)),
                    _ => Ok(Self::Identifier(name))
                }
            },
            _ => unexpected(&parser.current_token, &["a Number", "an Identifier"])
        }
    }

    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Assignment(assignment) => assignment.location,
            Self::FunctionCall(call) => call.location,
            Self::Binary(binary) => binary.location,
            Self::Identifier(ident) => ident.location,
            Self::Number(number) => number.location
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assignment(assignment) => write!(f, "{assignment}"),
            Self::FunctionCall(call) => write!(f, "{call}"),
            Self::Binary(binary) => write!(f, "{binary}"),
            Self::Identifier(ident) => write!(f, "{ident}"),
            Self::Number(number) => write!(f, "{number}")
        }
    }
}

// assignment -> <identifier> = <expression> | <identifier> *
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    pub name: Identifier,
    pub value: Box<Expression>,
    pub location: SrcSpan
}

impl AssignmentExpression {
    /// Desugars `name*` into `name = name + 1`; `end` is where the `*` ends.
    pub fn increment(name: Identifier, end: u32) -> Self {
        let location = SrcSpan { start: name.location.start, end };
        let star = SrcSpan { start: end.saturating_sub(1), end };

        let value = Expression::Binary(BinaryExpression {
            left: Box::new(Expression::Identifier(name.clone())),
            operator: Token::Plus,
            right: Box::new(Expression::Number(NumberLiteral { value: 1.0, location: star })),
            location
        });

        Self {
            name,
            value: Box::new(value),
            location
        }
    }

    /// Whether this assignment has the exact shape `name = name + 1`.
    pub fn is_increment(&self) -> bool {
        match self.value.as_ref() {
            Expression::Binary(BinaryExpression { left, operator: Token::Plus, right, .. }) => {
                matches!(left.as_ref(), Expression::Identifier(ident) if ident.name == self.name.name)
                    && matches!(right.as_ref(), Expression::Number(NumberLiteral { value, .. }) if *value == 1.0)
            },
            _ => false
        }
    }
}

impl Display for AssignmentExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // printed back as sugar so a `for` header stays parseable
        if self.is_increment() {
            write!(f, "{}*", self.name)
        } else {
            write!(f, "{} = {}", self.name, self.value)
        }
    }
}

// call -> <identifier> "[" [ <expression> { , <expression> } ] "]"
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: Identifier,
    pub arguments: Vec<Expression>,
    pub location: SrcSpan
}

impl FunctionCall {
    fn parse_arguments<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>,
        name: Identifier
    ) -> Result<Self, ParseError> {
        let _ = parser.expect_one(Token::LSBracket)?;

        let mut arguments = vec![];

        if !parser.is(&Token::RSBracket) {
            arguments.push(Expression::parse(parser)?);

            while parser.is(&Token::Comma) {
                parser.step();
                arguments.push(Expression::parse(parser)?);
            }
        }

        if !parser.is(&Token::RSBracket) {
            return unexpected(&parser.current_token, &["`,`", "`]`"]);
        }

        let (_, end) = parser.expect_one(Token::RSBracket)?;
        let location = SrcSpan { start: name.location.start, end };

        Ok(Self {
            name,
            arguments,
            location
        })
    }
}

impl Display for FunctionCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arguments = self.arguments.iter()
            .map(|arg| arg.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}[{}]", self.name, arguments.join(", "))
    }
}

// binary -> <expression> <operator> <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub left: Box<Expression>,
    pub operator: Token,
    pub right: Box<Expression>,
    pub location: SrcSpan
}

impl BinaryExpression {
    pub fn new(left: Expression, operator: Token, right: Expression) -> Self {
        let location = SrcSpan { start: left.location().start, end: right.location().end };

        Self {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            location
        }
    }
}

impl Display for BinaryExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator.as_literal(), self.right)
    }
}

// identifier -> (<letter> | _) { <letter> | <digit> | _ }
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub location: SrcSpan
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<(u32, String, u32)> for Identifier {
    fn from(value: (u32, String, u32)) -> Self {
        Identifier {
            name: value.1,
            location: SrcSpan { start: value.0, end: value.2 }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub value: f64,
    pub location: SrcSpan
}

impl Display for NumberLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
