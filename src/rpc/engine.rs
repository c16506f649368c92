//! Request engine. Turns decoded request lines into dispatcher calls and
//! status replies.
//!
//! Transport-decoupled: callers feed one line via [`RpcEngine::handle_line`]
//! and receive the encoded reply.  The stdin/stdout loop in
//! [`super::io_task`] is one such caller.

use std::path::PathBuf;
use std::sync::Arc;

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

use crate::adapters::thermal;
use crate::app::dispatch::Dispatcher;
use crate::app::ports::{EventSink, LinePort};

use super::codec::{self, BADLY_FORMED, Request, Response, View};

pub struct RpcEngine<P, S, D> {
    dispatcher: Arc<Dispatcher<P, S, D>>,
    cpu_temperature_path: PathBuf,
}

impl<P: LinePort, S: EventSink, D: DelayNs + Clone> RpcEngine<P, S, D> {
    pub fn new(dispatcher: Arc<Dispatcher<P, S, D>>, cpu_temperature_path: impl Into<PathBuf>) -> Self {
        Self {
            dispatcher,
            cpu_temperature_path: cpu_temperature_path.into(),
        }
    }

    /// Handle one request line.  Blank lines produce no reply.
    pub fn handle_line(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        Some(codec::encode_response(&self.handle(line)))
    }

    fn handle(&self, line: &str) -> Response {
        let request = match codec::decode_request(line) {
            Ok(request) => request,
            Err(e) => {
                warn!("API: {} ({:?})", BADLY_FORMED, e);
                return Response::error(BADLY_FORMED);
            }
        };

        let controller = self.dispatcher.controller();
        match request {
            Request::Instruction { item, command } => {
                debug!("API: item '{}' command '{}'", item, command);
                self.dispatcher.dispatch(&item, &command);
                match controller.status_list() {
                    Ok(list) => Response::Status(list),
                    Err(e) => Response::error(e),
                }
            }
            Request::View { view: View::Display } => {
                let temperature = thermal::read_cpu_temperature(&self.cpu_temperature_path);
                match controller.display_report(temperature) {
                    Ok(report) => Response::Display(report),
                    Err(e) => Response::error(e),
                }
            }
        }
    }
}
