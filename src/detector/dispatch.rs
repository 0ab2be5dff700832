//! Structured OSC dispatch
//!
//! A terminal parser that can route OSC sequences to registered handlers.
//! Handlers see the parameters after the numeric code and return `true` to
//! consume the sequence, which stops it from reaching later handlers or the
//! screen.

use std::collections::HashMap;

use tracing::trace;

/// String terminator `U+009C` as UTF-8
const C1_ST: [u8; 2] = [0xc2, 0x9c];

/// Handler for one OSC code; receives the `;`-separated parameters after the code
pub type OscHandler = Box<dyn FnMut(&[&[u8]]) -> bool + Send>;

/// Control-sequence dispatcher exposed by a terminal implementation
pub trait OscDispatcher: Send {
    /// Register a handler for an OSC code. Handlers run in registration order.
    fn register_osc_handler(&mut self, code: u16, handler: OscHandler);

    /// Feed raw terminal output through the parser
    fn advance(&mut self, bytes: &[u8]);
}

/// [`OscDispatcher`] over the `vte` state machine.
///
/// Parser state persists across calls, so sequences split between output
/// chunks are still dispatched once complete. `vte` only knows the 7-bit
/// string terminator, so the UTF-8 encoded C1 ST (`C2 9C`) is fed as `ESC \`.
pub struct VteDispatcher {
    parser: vte::Parser,
    router: OscRouter,
    /// A `C2` lead byte held back until the next byte shows whether it starts ST
    held_lead: bool,
}

#[derive(Default)]
struct OscRouter {
    handlers: HashMap<u16, Vec<OscHandler>>,
    consumed: u64,
    passed: u64,
}

impl VteDispatcher {
    pub fn new() -> Self {
        Self {
            parser: vte::Parser::new(),
            router: OscRouter::default(),
            held_lead: false,
        }
    }

    fn feed(&mut self, byte: u8) {
        self.parser.advance(&mut self.router, byte);
    }

    /// OSC sequences a handler consumed
    pub fn consumed(&self) -> u64 {
        self.router.consumed
    }

    /// OSC sequences left for the renderer
    pub fn passed_through(&self) -> u64 {
        self.router.passed
    }
}

impl Default for VteDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl OscDispatcher for VteDispatcher {
    fn register_osc_handler(&mut self, code: u16, handler: OscHandler) {
        self.router.handlers.entry(code).or_default().push(handler);
    }

    fn advance(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if std::mem::take(&mut self.held_lead) {
                if byte == C1_ST[1] {
                    self.feed(0x1b);
                    self.feed(b'\\');
                    continue;
                }
                self.feed(C1_ST[0]);
            }

            if byte == C1_ST[0] {
                self.held_lead = true;
            } else {
                self.feed(byte);
            }
        }
    }
}

impl vte::Perform for OscRouter {
    fn osc_dispatch(&mut self, params: &[&[u8]], _bell_terminated: bool) {
        let Some((code, rest)) = params.split_first() else {
            return;
        };

        let code = std::str::from_utf8(code)
            .ok()
            .and_then(|c| c.parse::<u16>().ok());

        let consumed = match code.and_then(|c| self.handlers.get_mut(&c)) {
            Some(handlers) => handlers.iter_mut().any(|handler| handler(rest)),
            None => false,
        };

        if consumed {
            self.consumed += 1;
        } else {
            trace!(?code, "OSC sequence passed through");
            self.passed += 1;
        }
    }
}
