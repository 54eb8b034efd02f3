use crate::{Argument, FieldName, OpName, Pos};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDoc<'a> {
    pub definitions: Vec<Operation<'a>>,
}

impl<'a> QueryDoc<'a> {
    pub fn new() -> QueryDoc<'a> {
        QueryDoc {
            definitions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation<'a> {
    OpDef(OpDef<'a>),
    // the `{ ... }` shorthand; always a query.
    SelectionSet(Vec<Field<'a>>),
}

impl<'a> Operation<'a> {
    pub fn op_type(&self) -> OpType {
        match self {
            Operation::OpDef(op_def) => op_def.op_type,
            Operation::SelectionSet(_) => OpType::Query,
        }
    }

    pub fn name(&self) -> Option<OpName<'a>> {
        match self {
            Operation::OpDef(op_def) => op_def.op_name,
            Operation::SelectionSet(_) => None,
        }
    }

    pub fn selection_set(&self) -> &[Field<'a>] {
        match self {
            Operation::OpDef(op_def) => &op_def.selection_set,
            Operation::SelectionSet(selection_set) => selection_set,
        }
    }
}

/// https://spec.graphql.org/October2021/#OperationDefinition
#[derive(Debug, Clone, PartialEq)]
pub struct OpDef<'a> {
    pub pos: Pos,
    pub op_type: OpType,
    pub op_name: Option<OpName<'a>>,
    pub selection_set: Vec<Field<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field<'a> {
    pub pos: Pos,
    pub alias: Option<FieldName<'a>>,
    pub name: FieldName<'a>,
    pub arguments: Vec<Argument<'a>>,
    pub selection_set: Vec<Field<'a>>,
}

impl<'a> Field<'a> {
    /// The key this field is written under in the response: the alias if there is one.
    pub fn response_name(&self) -> &'a str {
        self.alias.unwrap_or(self.name).as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpType {
    Query,
    Mutation,
    Subscription,
}

impl OpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpType::Query => "query",
            OpType::Mutation => "mutation",
            OpType::Subscription => "subscription",
        }
    }
}
