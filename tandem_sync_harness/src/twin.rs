// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use tandem_core::channel::Channel;
use tandem_core::command::ElementOptions;
use tandem_core::document::Document;
use tandem_core::element::{ElementId, PropertyBag};
use tandem_core::factory::TypeRegistry;
use tandem_core::headless::HeadlessDocument;
use tandem_core::trace::Tracer;
use tandem_core::{Surface, SurfaceConfig, SyncError};

use crate::divergence::{Divergence, diff};
use crate::json_channel::JsonChannel;
use crate::stats::SyncStats;

/// A producer and a renderer surface joined by a channel.
#[derive(Debug)]
pub struct Twin<C: Channel = JsonChannel> {
    producer: Surface,
    renderer: Surface,
    channel: C,
    stats: SyncStats,
}

impl Twin {
    /// Creates a twin with built-in types, a [`HeadlessDocument`] and a
    /// [`JsonChannel`].
    ///
    /// # Errors
    ///
    /// Propagates a failure to create the producer root.
    pub fn new(config: SurfaceConfig) -> Result<Self, SyncError> {
        Self::with_parts(
            config,
            TypeRegistry::with_builtins(),
            Box::new(HeadlessDocument::new()),
            JsonChannel::new(),
        )
    }
}

impl<C: Channel> Twin<C> {
    /// Creates a twin from explicit parts. Both sides use `types`.
    ///
    /// # Errors
    ///
    /// Propagates a failure to create the producer root.
    pub fn with_parts(
        config: SurfaceConfig,
        types: TypeRegistry,
        document: Box<dyn Document>,
        channel: C,
    ) -> Result<Self, SyncError> {
        Ok(Self {
            producer: Surface::producer(config, types.clone())?,
            renderer: Surface::renderer(config, types, document),
            channel,
            stats: SyncStats::default(),
        })
    }

    /// The producer surface.
    #[must_use]
    pub fn producer(&self) -> &Surface {
        &self.producer
    }

    /// The producer surface, for scene edits.
    pub fn producer_mut(&mut self) -> &mut Surface {
        &mut self.producer
    }

    /// The renderer surface.
    #[must_use]
    pub fn renderer(&self) -> &Surface {
        &self.renderer
    }

    /// The renderer surface, for tampering in tests.
    pub fn renderer_mut(&mut self) -> &mut Surface {
        &mut self.renderer
    }

    /// The channel.
    #[must_use]
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// The channel, for injecting traffic in tests.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Counts so far.
    #[must_use]
    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Flushes the producer, sends the batch, and applies everything the
    /// channel delivers on the renderer.
    ///
    /// # Errors
    ///
    /// The first fault raised by the channel or the renderer. Batches still
    /// queued behind it stay in the channel.
    pub fn sync(&mut self) -> Result<(), SyncError> {
        self.sync_traced(&mut Tracer::none(), &mut Tracer::none())
    }

    /// Like [`sync`](Self::sync), reporting each side to its own tracer.
    ///
    /// # Errors
    ///
    /// See [`sync`](Self::sync).
    pub fn sync_traced(
        &mut self,
        producer: &mut Tracer<'_>,
        renderer: &mut Tracer<'_>,
    ) -> Result<(), SyncError> {
        let batch = self.producer.flush_traced(producer)?;
        self.channel.send(batch)?;
        while let Some(batch) = self.channel.receive()? {
            self.renderer.execute_traced(&batch, renderer)?;
            self.stats.observe(&batch);
        }
        Ok(())
    }

    /// Plays a multi-frame property change on `id`: list-valued properties
    /// contribute one value per frame, and each frame is synced before the
    /// next is set. Returns the number of frames played.
    ///
    /// # Errors
    ///
    /// Faults from the producer edit or the sync.
    pub fn play(&mut self, id: ElementId, mut frames: PropertyBag) -> Result<usize, SyncError> {
        let mut played = 0;
        loop {
            let (frame, more) = frames.take_frame();
            self.producer.set(id, ElementOptions::from_props(frame))?;
            self.sync()?;
            played += 1;
            if !more {
                return Ok(played);
            }
        }
    }

    /// Differences between the two registries.
    #[must_use]
    pub fn divergences(&self) -> Vec<Divergence> {
        diff(self.producer.registry(), self.renderer.registry())
    }
}
