//! Single-level transactions backed by a snapshot of the node graph.

use std::collections::BTreeMap;

use crate::{Document, IrError, Node, NodeId, Result};

/// An open transaction: its name plus the state to restore on abort.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Transaction {
    name: String,
    nodes: BTreeMap<NodeId, Node>,
    roots: Vec<NodeId>,
    next_id: NodeId,
}

impl Document {
    /// Open a named transaction.
    pub fn begin_transaction(&mut self, name: impl Into<String>) -> Result<()> {
        if let Some(open) = &self.transaction {
            return Err(IrError::TransactionOpen(open.name.clone()));
        }
        let name = name.into();
        log::debug!("begin transaction '{}'", name);
        self.transaction = Some(Transaction {
            name,
            nodes: self.nodes.clone(),
            roots: self.roots.clone(),
            next_id: self.next_id,
        });
        Ok(())
    }

    /// Keep every change made since the transaction opened.
    pub fn commit_transaction(&mut self) -> Result<()> {
        let tx = self.transaction.take().ok_or(IrError::NoTransaction)?;
        log::debug!("commit transaction '{}'", tx.name);
        Ok(())
    }

    /// Discard every change made since the transaction opened.
    pub fn abort_transaction(&mut self) -> Result<()> {
        let tx = self.transaction.take().ok_or(IrError::NoTransaction)?;
        log::debug!("abort transaction '{}'", tx.name);
        self.nodes = tx.nodes;
        self.roots = tx.roots;
        self.next_id = tx.next_id;
        let nodes = &self.nodes;
        self.selection.retain(|id| nodes.contains_key(id));
        Ok(())
    }

    /// Name of the open transaction.
    pub fn open_transaction(&self) -> Option<&str> {
        self.transaction.as_ref().map(|t| t.name.as_str())
    }
}
