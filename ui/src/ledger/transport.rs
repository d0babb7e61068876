use async_trait::async_trait;

use crate::services::errors::LedgerErrorKind;

/// Byte-level link to a Ledger device
#[async_trait(?Send)]
pub trait LedgerTransport {
    /// Sends one encoded APDU and returns the raw answer including the status word
    async fn exchange(&self, apdu: &[u8]) -> Result<Vec<u8>, LedgerErrorKind>;

    async fn close(&self);
}

/// Opens transports; the browser implementation shows the WebHID picker
#[async_trait(?Send)]
pub trait TransportOpener {
    type Transport: LedgerTransport;

    async fn open(&self) -> Result<Self::Transport, LedgerErrorKind>;
}

/// Stand-in for builds without WebHID; opening always fails
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsupportedOpener;

pub enum NoTransport {}

#[async_trait(?Send)]
impl LedgerTransport for NoTransport {
    async fn exchange(&self, _apdu: &[u8]) -> Result<Vec<u8>, LedgerErrorKind> {
        match *self {}
    }

    async fn close(&self) {
        match *self {}
    }
}

#[async_trait(?Send)]
impl TransportOpener for UnsupportedOpener {
    type Transport = NoTransport;

    async fn open(&self) -> Result<NoTransport, LedgerErrorKind> {
        Err(LedgerErrorKind::WebHidUnsupported)
    }
}

#[cfg(test)]
pub mod scripted {
    //! In-memory transport answering from a script

    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    pub struct ScriptedTransport {
        responses: Rc<RefCell<VecDeque<Result<Vec<u8>, LedgerErrorKind>>>>,
        sent: Rc<RefCell<Vec<Vec<u8>>>>,
        closed: Rc<RefCell<bool>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues `data` followed by the status word
        pub fn respond(&self, data: &[u8], status_word: u16) -> &Self {
            let mut bytes = data.to_vec();
            bytes.extend_from_slice(&status_word.to_be_bytes());
            self.responses.borrow_mut().push_back(Ok(bytes));
            self
        }

        pub fn fail(&self, kind: LedgerErrorKind) -> &Self {
            self.responses.borrow_mut().push_back(Err(kind));
            self
        }

        pub fn sent(&self) -> Vec<Vec<u8>> {
            self.sent.borrow().clone()
        }

        pub fn is_closed(&self) -> bool {
            *self.closed.borrow()
        }
    }

    #[async_trait(?Send)]
    impl LedgerTransport for ScriptedTransport {
        async fn exchange(&self, apdu: &[u8]) -> Result<Vec<u8>, LedgerErrorKind> {
            self.sent.borrow_mut().push(apdu.to_vec());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(LedgerErrorKind::DeviceDisconnected))
        }

        async fn close(&self) {
            *self.closed.borrow_mut() = true;
        }
    }

    /// Hands out clones of one scripted transport
    #[derive(Clone, Default)]
    pub struct ScriptedOpener {
        pub transport: ScriptedTransport,
        pub open_error: Option<LedgerErrorKind>,
    }

    #[async_trait(?Send)]
    impl TransportOpener for ScriptedOpener {
        type Transport = ScriptedTransport;

        async fn open(&self) -> Result<ScriptedTransport, LedgerErrorKind> {
            match &self.open_error {
                Some(kind) => Err(kind.clone()),
                None => Ok(self.transport.clone()),
            }
        }
    }
}
