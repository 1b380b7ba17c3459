use crate::state::events::Event;

/// A Message to be delivered to the scene, or to an observer of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// The entity that sent this message.
    /// If None, then the host or scene sent the message.
    pub sender_entity_id: Option<u32>,

    /// The entity to which to route this Message.
    /// If None, whoever drains the dispatcher handles it.
    pub recipient_entity_id: Option<u32>,
    /// The event payload describing whatever happened
    pub event: Event,
}

impl Message {
    fn new(sender: Option<u32>, recipient: Option<u32>, event: Event) -> Self {
        Message {
            sender_entity_id: sender,
            recipient_entity_id: recipient,
            event,
        }
    }
}

pub trait MessageHandler {
    fn handle_message(&mut self, message: &Message);
}

#[derive(Debug, Default)]
pub struct Dispatcher {
    pub messages: Vec<Message>,
}

impl Dispatcher {
    pub fn entity_to_global(&mut self, sender: u32, event: Event) {
        self.messages.push(Message::new(Some(sender), None, event));
    }

    pub fn entity_to_entity(&mut self, sender: u32, recipient: u32, event: Event) {
        self.messages
            .push(Message::new(Some(sender), Some(recipient), event));
    }

    pub fn broadcast(&mut self, event: Event) {
        self.messages.push(Message::new(None, None, event));
    }

    pub fn dispatch(messages: &[Message], handler: &mut dyn MessageHandler) {
        for m in messages {
            handler.handle_message(m);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the current message buffer, and clears it.
    pub fn drain(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }
}
