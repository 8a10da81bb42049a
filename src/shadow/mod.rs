pub mod clip;
pub mod mixer;
pub mod scene;
pub mod track;
pub mod transport;

pub use clip::ClipGrid;
pub use mixer::MixerModel;
pub use scene::SceneList;
pub use track::TrackList;
pub use transport::TransportState;

/// The full set of shadow models the link layer maintains.
#[derive(Default)]
pub struct ShadowState {
    pub clips: ClipGrid,
    pub tracks: TrackList,
    pub scenes: SceneList,
    pub mixer: MixerModel,
    pub transport: TransportState,
}

impl ShadowState {
    pub fn new() -> Self {
        Self::default()
    }
}
