//! Event-driven selection session
//!
//! A `Session` owns a `LocationSelector` and handles one event at a time.
//! Address lookups and device location requests run as spawned tasks and
//! report back through an internal channel, so a slow lookup never holds up
//! the next coordinate change. After every event the new snapshot is
//! published on a watch channel.

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geo::device::locate_with_timeout;
use crate::geo::{DeviceLocator, GeocodeFailure, LocationFailure, ReverseGeocoder};
use crate::selection::{LocationSelector, LookupRequest, RequestId, SelectionSnapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

type Reply = oneshot::Sender<SelectionSnapshot>;

/// Input from the presentation layer
enum Command {
    Pick(Coordinates, Reply),
    UseMyLocation(Reply),
    Confirm(Reply),
}

/// Results of work the session started
enum Completion {
    Geocoded {
        id: RequestId,
        result: std::result::Result<String, GeocodeFailure>,
    },
    Located(std::result::Result<Coordinates, LocationFailure>),
}

/// A running selection workflow
pub struct Session<G, L> {
    id: Uuid,
    selector: LocationSelector,
    geocoder: Arc<G>,
    locator: Arc<L>,
    locate_timeout: Duration,
    commands: mpsc::UnboundedReceiver<Command>,
    completions: mpsc::UnboundedReceiver<Completion>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    published: watch::Sender<SelectionSnapshot>,
}

/// Cloneable handle used to drive a session and observe its state
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<SelectionSnapshot>,
}

impl<G, L> Session<G, L>
where
    G: ReverseGeocoder + 'static,
    L: DeviceLocator + 'static,
{
    /// Create a session and its handle
    ///
    /// Nothing happens until `run` is awaited (or `spawn` is used).
    pub fn new(
        selector: LocationSelector,
        geocoder: G,
        locator: L,
        locate_timeout: Duration,
    ) -> (Self, SessionHandle) {
        let (commands_tx, commands) = mpsc::unbounded_channel();
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let (published, snapshots) = watch::channel(selector.snapshot().clone());

        let session = Self {
            id: Uuid::new_v4(),
            selector,
            geocoder: Arc::new(geocoder),
            locator: Arc::new(locator),
            locate_timeout,
            commands,
            completions,
            completions_tx,
            published,
        };
        let handle = SessionHandle {
            commands: commands_tx,
            snapshots,
        };

        (session, handle)
    }

    /// Create a session and run it on the tokio runtime
    pub fn spawn(
        selector: LocationSelector,
        geocoder: G,
        locator: L,
        locate_timeout: Duration,
    ) -> SessionHandle {
        let (session, handle) = Self::new(selector, geocoder, locator, locate_timeout);
        let span = info_span!("session", id = %session.id);
        tokio::spawn(session.run().instrument(span));
        handle
    }

    /// Process events until every handle has been dropped
    pub async fn run(mut self) {
        debug!("Session {} started", self.id);

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(completion) = self.completions.recv() => {
                    self.handle_completion(completion);
                }
            }
        }

        debug!("Session {} ended", self.id);
    }

    fn handle_command(&mut self, command: Command) {
        let reply = match command {
            Command::Pick(coords, reply) => {
                let request = self.selector.on_coordinate_change(coords);
                self.dispatch_lookup(request);
                reply
            }
            Command::UseMyLocation(reply) => {
                self.selector.on_use_my_location();
                self.dispatch_locate();
                reply
            }
            Command::Confirm(reply) => {
                self.selector.on_confirm();
                reply
            }
        };

        let snapshot = self.publish();
        // The caller may have stopped waiting
        let _ = reply.send(snapshot);
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Geocoded { id, result } => {
                if let Err(reason) = &result {
                    warn!("Address lookup {} failed: {}", id, reason);
                }
                self.selector.on_geocode_result(id, result);
            }
            Completion::Located(result) => {
                if let Err(reason) = &result {
                    warn!("Device location failed: {}", reason);
                }
                if let Some(request) = self.selector.on_location_result(result) {
                    self.dispatch_lookup(request);
                }
            }
        }

        self.publish();
    }

    fn publish(&self) -> SelectionSnapshot {
        let snapshot = self.selector.snapshot().clone();
        self.published.send_replace(snapshot.clone());
        snapshot
    }

    fn dispatch_lookup(&self, request: LookupRequest) {
        let geocoder = Arc::clone(&self.geocoder);
        let completions = self.completions_tx.clone();

        tokio::spawn(
            async move {
                let result = geocoder.reverse_geocode(request.coordinates).await;
                let _ = completions.send(Completion::Geocoded {
                    id: request.id,
                    result,
                });
            }
            .in_current_span(),
        );
    }

    fn dispatch_locate(&self) {
        let locator = Arc::clone(&self.locator);
        let completions = self.completions_tx.clone();
        let timeout = self.locate_timeout;

        tokio::spawn(
            async move {
                let result = locate_with_timeout(locator.as_ref(), timeout).await;
                let _ = completions.send(Completion::Located(result));
            }
            .in_current_span(),
        );
    }
}

fn session_ended() -> Error {
    Error::Session("session has ended".to_string())
}

impl SessionHandle {
    /// Select a point (map click, drag release, typed coordinate)
    ///
    /// Out-of-range coordinates are rejected here and never reach the
    /// session.
    pub async fn pick(&self, coords: Coordinates) -> Result<SelectionSnapshot> {
        coords.validate()?;
        self.request(|reply| Command::Pick(coords, reply)).await
    }

    /// Ask the device for its location
    pub async fn use_my_location(&self) -> Result<SelectionSnapshot> {
        self.request(Command::UseMyLocation).await
    }

    /// Confirm the current point
    pub async fn confirm(&self) -> Result<SelectionSnapshot> {
        let snapshot = self.request(Command::Confirm).await?;
        info!("Confirm requested: {}", snapshot.phase());
        Ok(snapshot)
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> SelectionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Watch published snapshots
    pub fn subscribe(&self) -> watch::Receiver<SelectionSnapshot> {
        self.snapshots.clone()
    }

    /// Wait until a published snapshot satisfies `predicate`
    ///
    /// The latest snapshot is checked first.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&SelectionSnapshot) -> bool,
    ) -> Result<SelectionSnapshot> {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(predicate)
            .await
            .map_err(|_| session_ended())?;
        Ok(snapshot.clone())
    }

    async fn request(&self, command: impl FnOnce(Reply) -> Command) -> Result<SelectionSnapshot> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .map_err(|_| session_ended())?;
        response.await.map_err(|_| session_ended())
    }
}
