//! Request state machine
//!
//! At most one refresh request is outstanding. Every outcome, whether a
//! reply, a transport failure or giving up on a silent companion, returns
//! the client to `Idle`.

/// Request states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestState {
    /// No request outstanding; a refresh may be sent
    #[default]
    Idle,
    /// Request handed to the link, reply not yet received
    AwaitingResponse,
}

/// Events that drive the request state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestEvent {
    /// Refresh request accepted by the link
    RequestSent,
    /// Link confirmed delivery to the companion
    DeliveryConfirmed,
    /// Companion reply received, whatever its content
    ReplyReceived,
    /// Link reported the request as undeliverable
    TransportFailed,
    /// No reply within a full refresh interval
    ReplyOverdue,
}

impl RequestState {
    pub fn is_awaiting(&self) -> bool {
        matches!(self, RequestState::AwaitingResponse)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: RequestEvent) -> Self {
        use RequestEvent::*;
        use RequestState::*;

        match (self, event) {
            (Idle, RequestSent) => AwaitingResponse,

            // Delivery only means the companion has it; the reply is still due
            (AwaitingResponse, DeliveryConfirmed) => AwaitingResponse,
            (AwaitingResponse, ReplyReceived) => Idle,
            (AwaitingResponse, TransportFailed) => Idle,
            (AwaitingResponse, ReplyOverdue) => Idle,

            // Unsolicited replies and late outcomes leave Idle as it is
            _ => self,
        }
    }
}
