use std::collections::HashMap;

use super::error::EnvironmentError;
use super::value::Value;

/// Stable handle to a frame of an [`Environment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(usize);

#[derive(Debug, Default, Clone, PartialEq)]
struct Frame {
    parent: Option<FrameId>,
    store: HashMap<String, Value>,
    // held by a routine value, must outlive the block that created it
    captured: bool,
    live: bool,
}

/// Arena of scope frames linked through parent handles.
///
/// Frame 0 is the global frame and lives as long as the arena. Every other
/// frame is created by [`Environment::push`] and handed back with
/// [`Environment::release`] when its block exits. A frame captured by a
/// routine (see [`Environment::capture`]) ignores the release, and so do
/// its ancestors, since lookups from the routine body walk through them.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    frames: Vec<Frame>,
    free: Vec<usize>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame { live: true, captured: true, ..Default::default() }],
            free: vec![],
        }
    }

    pub fn global(&self) -> FrameId {
        FrameId(0)
    }

    pub fn push(&mut self, parent: FrameId) -> FrameId {
        let frame = Frame {
            parent: Some(parent),
            live: true,
            ..Default::default()
        };

        match self.free.pop() {
            Some(idx) => {
                self.frames[idx] = frame;
                FrameId(idx)
            },
            None => {
                self.frames.push(frame);
                FrameId(self.frames.len() - 1)
            }
        }
    }

    pub fn release(&mut self, id: FrameId) {
        let frame = &mut self.frames[id.0];

        if frame.captured || !frame.live {
            return;
        }

        frame.live = false;
        frame.parent = None;
        frame.store.clear();
        self.free.push(id.0);
    }

    pub fn capture(&mut self, id: FrameId) {
        let mut current = Some(id);

        while let Some(id) = current {
            let frame = &mut self.frames[id.0];

            if frame.captured {
                break;
            }

            frame.captured = true;
            current = frame.parent;
        }
    }

    /// Number of frames currently holding bindings, the global one included.
    pub fn live_frames(&self) -> usize {
        self.frames.iter().filter(|frame| frame.live).count()
    }

    pub fn declare(&mut self, id: FrameId, name: String, value: Value) -> Result<(), EnvironmentError> {
        let frame = &mut self.frames[id.0];

        if frame.store.contains_key(&name) {
            return Err(EnvironmentError::DuplicateDeclaration { name });
        }

        frame.store.insert(name, value);

        Ok(())
    }

    pub fn assign(&mut self, id: FrameId, name: &str, value: Value) -> Result<(), EnvironmentError> {
        let mut current = Some(id);

        while let Some(id) = current {
            let frame = &mut self.frames[id.0];

            if let Some(slot) = frame.store.get_mut(name) {
                *slot = value;
                return Ok(());
            }

            current = frame.parent;
        }

        Err(EnvironmentError::UndeclaredVariable { name: name.to_string() })
    }

    pub fn get(&self, id: FrameId, name: &str) -> Result<&Value, EnvironmentError> {
        let mut current = Some(id);

        while let Some(id) = current {
            let frame = &self.frames[id.0];

            if let Some(value) = frame.store.get(name) {
                return Ok(value);
            }

            current = frame.parent;
        }

        Err(EnvironmentError::UndeclaredVariable { name: name.to_string() })
    }
}
