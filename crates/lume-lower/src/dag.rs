//! Lambda compilation units and their DAG nodes.
//!
//! A [`LambdaFunction`] is the unit handed to the code generator: an arena
//! of [`DagNode`]s plus either root expressions (switch context) or a body
//! expression (environment context). Nodes reference each other by
//! [`DagNodeId`], so the arena is acyclic by construction.

use lume_common::Semantic;
use lume_types::{Ty, Value};

/// Index of a node in a lambda function's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DagNodeId(pub u32);

/// A named argument of a DAG call node.
#[derive(Debug, Clone, PartialEq)]
pub struct CallArgument {
    pub name: String,
    pub node: DagNodeId,
}

/// A node in the lowering DAG.
#[derive(Debug, Clone, PartialEq)]
pub enum DagNode {
    /// A constant value.
    Constant(Value),
    /// A call with named, already-converted arguments.
    Call {
        name: String,
        semantic: Semantic,
        arguments: Vec<CallArgument>,
        return_type: Ty,
    },
}

/// The execution context a lambda function is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LambdaContext {
    /// General switch/root context: expressions are attached as root slots.
    Switch,
    /// Environment context: a single-entry function shape with one body
    /// expression.
    Environment,
}

/// A lambda-style compilation unit scoped to one execution context.
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaFunction {
    context: LambdaContext,
    nodes: Vec<DagNode>,
    roots: Vec<DagNodeId>,
    body: Option<DagNodeId>,
}

impl LambdaFunction {
    pub fn new(context: LambdaContext) -> Self {
        LambdaFunction {
            context,
            nodes: Vec::new(),
            roots: Vec::new(),
            body: None,
        }
    }

    pub fn context(&self) -> LambdaContext {
        self.context
    }

    /// Add a constant node.
    pub fn create_constant(&mut self, value: Value) -> DagNodeId {
        self.push(DagNode::Constant(value))
    }

    /// Add a call node over already-converted arguments.
    pub fn create_call(
        &mut self,
        name: impl Into<String>,
        semantic: Semantic,
        arguments: Vec<CallArgument>,
        return_type: Ty,
    ) -> DagNodeId {
        self.push(DagNode::Call {
            name: name.into(),
            semantic,
            arguments,
            return_type,
        })
    }

    fn push(&mut self, node: DagNode) -> DagNodeId {
        let id = DagNodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Attach a root expression (switch context) and return its slot.
    pub fn store_root_expr(&mut self, node: DagNodeId) -> usize {
        self.roots.push(node);
        self.roots.len() - 1
    }

    /// Attach the body expression (environment context).
    pub fn set_body(&mut self, node: DagNodeId) {
        self.body = Some(node);
    }

    pub fn node(&self, id: DagNodeId) -> &DagNode {
        &self.nodes[id.0 as usize]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn roots(&self) -> &[DagNodeId] {
        &self.roots
    }

    pub fn body(&self) -> Option<DagNodeId> {
        self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_ids_are_sequential() {
        let mut lambda = LambdaFunction::new(LambdaContext::Switch);
        let a = lambda.create_constant(Value::Float(1.0));
        let b = lambda.create_call(
            "::math::sin",
            Semantic::Intrinsic,
            vec![CallArgument { name: "x".into(), node: a }],
            Ty::float(),
        );
        assert_eq!(a, DagNodeId(0));
        assert_eq!(b, DagNodeId(1));
        assert_eq!(lambda.node_count(), 2);
    }

    #[test]
    fn root_and_body_attachment() {
        let mut lambda = LambdaFunction::new(LambdaContext::Switch);
        let a = lambda.create_constant(Value::Int(1));
        assert_eq!(lambda.store_root_expr(a), 0);
        assert_eq!(lambda.roots(), &[a]);

        let mut env = LambdaFunction::new(LambdaContext::Environment);
        let b = env.create_constant(Value::Int(2));
        env.set_body(b);
        assert_eq!(env.body(), Some(b));
        assert!(env.roots().is_empty());
    }
}
