//! The 4-entry scene list shadow. Absolute indexing — no ring motion
//! affects scene identity, only which 4 are currently visible.

use crate::codec::Rgb;
use crate::ring::RING_HEIGHT;

pub const DEFAULT_SCENE_COLOR: Rgb = Rgb::new(0x1a, 0x1a, 0x1a);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneInfo {
    pub name: String,
    pub color: Rgb,
    pub triggered: bool,
}

impl SceneInfo {
    fn default_for(index: usize) -> Self {
        Self {
            name: format!("Scene {}", index + 1),
            color: DEFAULT_SCENE_COLOR,
            triggered: false,
        }
    }
}

pub struct SceneList {
    scenes: Vec<SceneInfo>,
}

impl Default for SceneList {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneList {
    pub fn new() -> Self {
        Self {
            scenes: (0..RING_HEIGHT as usize).map(SceneInfo::default_for).collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&SceneInfo> {
        self.scenes.get(index)
    }

    pub fn set_name(&mut self, index: usize, name: String) -> bool {
        match self.scenes.get_mut(index) {
            Some(s) if s.name != name => {
                s.name = name;
                true
            }
            _ => false,
        }
    }

    pub fn set_color(&mut self, index: usize, color: Rgb) -> bool {
        match self.scenes.get_mut(index) {
            Some(s) if s.color != color => {
                s.color = color;
                true
            }
            _ => false,
        }
    }

    pub fn set_triggered(&mut self, index: usize, triggered: bool) -> bool {
        match self.scenes.get_mut(index) {
            Some(s) if s.triggered != triggered => {
                s.triggered = triggered;
                true
            }
            _ => false,
        }
    }
}
