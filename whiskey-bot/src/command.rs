pub mod basic;
pub mod builtin;
pub mod named;

use async_trait::async_trait;
use whiskey::api::Message;

use crate::context::Context;

#[derive(Debug, Default, Clone)]
pub struct Info {
    pub trigger: Option<String>,
    pub aliases: Vec<String>,
    pub description: Option<String>,
}

impl Info {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trigger(mut self, trigger: impl ToString) -> Self {
        self.trigger = Some(trigger.to_string());
        self
    }

    pub fn with_alias(mut self, alias: impl ToString) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn with_description(mut self, description: impl ToString) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn prepend_trigger(&mut self, trigger: impl ToString) {
        let cur_trigger = self.trigger.get_or_insert_default();
        if !cur_trigger.is_empty() {
            cur_trigger.insert(0, ' ');
        }
        cur_trigger.insert_str(0, &trigger.to_string());
    }

    pub fn with_prepended_trigger(mut self, trigger: impl ToString) -> Self {
        self.prepend_trigger(trigger);
        self
    }
}

/// Whether a message should propagate to subsequent commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagate {
    No,
    Yes,
}

#[allow(unused_variables)]
#[async_trait]
pub trait Command<E = whiskey::Error> {
    fn info(&self, ctx: &Context<E>) -> Info {
        Info::default()
    }

    async fn execute(&self, arg: &str, msg: &Message, ctx: &Context<E>)
        -> Result<Propagate, E>;
}

pub struct Commands<E = whiskey::Error> {
    commands: Vec<Box<dyn Command<E> + Sync + Send>>,
}

impl<E> Commands<E> {
    pub fn new() -> Self {
        Self { commands: vec![] }
    }

    pub fn add(&mut self, command: impl Command<E> + Sync + Send + 'static) {
        self.commands.push(Box::new(command));
    }

    pub fn then(mut self, command: impl Command<E> + Sync + Send + 'static) -> Self {
        self.add(command);
        self
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn infos(&self, ctx: &Context<E>) -> Vec<Info> {
        self.commands.iter().map(|c| c.info(ctx)).collect()
    }

    /// Run the message through all commands until one of them stops it.
    pub async fn on_message(&self, msg: &Message, ctx: &Context<E>) -> Result<Propagate, E> {
        for command in &self.commands {
            let propagate = command.execute(&msg.content, msg, ctx).await?;
            if propagate == Propagate::No {
                return Ok(Propagate::No);
            }
        }

        Ok(Propagate::Yes)
    }
}

// Has fewer restrictions on generic types than #[derive(Default)].
impl<E> Default for Commands<E> {
    fn default() -> Self {
        Self::new()
    }
}
