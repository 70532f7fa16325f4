// Arena-based command tree with stable node handles

use crate::tree::command::{CommandNode, CommandSpec};
use crate::tree::error::{TreeError, TreeResult};
use crate::tree::flag::Flag;

/// Stable handle to a command node within a `CommandTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(usize);

/// Hierarchical registry of commands and their flags
///
/// Nodes live in an arena owned by the tree and are addressed by
/// `CommandId`; children are ordered id lists, so the structure is acyclic
/// by construction and free of back-reference cycles. The tree is built
/// once during startup and is read-only afterwards; resolution never
/// mutates it.
pub struct CommandTree {
    nodes: Vec<CommandNode>,
    root: CommandId,
}

impl CommandTree {
    /// Create a tree with the given root command
    pub fn new(root: CommandSpec) -> Self {
        Self {
            nodes: vec![CommandNode::from_spec(root)],
            root: CommandId(0),
        }
    }

    /// Handle of the root command
    pub fn root(&self) -> CommandId {
        self.root
    }

    /// Access a node by handle
    pub fn node(&self, id: CommandId) -> &CommandNode {
        &self.nodes[id.0]
    }

    /// Create a detached node, to be linked with `add_child`
    pub fn insert(&mut self, spec: CommandSpec) -> CommandId {
        self.nodes.push(CommandNode::from_spec(spec));
        CommandId(self.nodes.len() - 1)
    }

    /// Link an existing node under a parent
    ///
    /// Fails if the child already has a parent or if a sibling with the
    /// same name exists.
    pub fn add_child(&mut self, parent: CommandId, child: CommandId) -> TreeResult<()> {
        if self.nodes[child.0].parent.is_some() {
            return Err(TreeError::AlreadyParented(self.nodes[child.0].name.clone()));
        }
        let name = self.nodes[child.0].name.clone();
        if self.child_named(parent, &name).is_some() {
            return Err(TreeError::DuplicateName {
                parent: self.nodes[parent.0].name.clone(),
                name,
            });
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Create a node and link it under a parent in one step
    pub fn command(&mut self, parent: CommandId, spec: CommandSpec) -> TreeResult<CommandId> {
        let child = self.insert(spec);
        self.add_child(parent, child)?;
        Ok(child)
    }

    /// Declare a flag owned by (and visible on) one command
    pub fn flag(&mut self, command: CommandId, flag: Flag) -> TreeResult<()> {
        self.check_flag_name(command, &flag.name)?;
        self.nodes[command.0].flags.push(flag);
        Ok(())
    }

    /// Declare a flag owned by a command and visible on its whole subtree
    pub fn persistent_flag(&mut self, command: CommandId, flag: Flag) -> TreeResult<()> {
        self.check_flag_name(command, &flag.name)?;
        self.nodes[command.0].persistent_flags.push(flag);
        Ok(())
    }

    fn check_flag_name(&self, command: CommandId, name: &str) -> TreeResult<()> {
        let node = &self.nodes[command.0];
        if node.flags.contains(name) || node.persistent_flags.contains(name) {
            return Err(TreeError::DuplicateFlag {
                command: node.name.clone(),
                flag: name.to_string(),
            });
        }
        Ok(())
    }

    /// Find a direct child by its literal name
    pub fn child_named(&self, parent: CommandId, name: &str) -> Option<CommandId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes[child.0].name == name)
    }

    /// Flags visible on a command: its own plus persistent flags of every
    /// command on the path from the root, in root-to-leaf declaration order
    pub fn visible_flags(&self, command: CommandId) -> Vec<&Flag> {
        let mut path = Vec::new();
        let mut cursor = Some(command);
        while let Some(id) = cursor {
            path.push(id);
            cursor = self.nodes[id.0].parent;
        }

        let mut flags = Vec::new();
        for id in path.iter().rev() {
            flags.extend(self.nodes[id.0].persistent_flags.iter());
        }
        flags.extend(self.nodes[command.0].flags.iter());
        flags
    }
}
