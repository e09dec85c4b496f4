use std::sync::Arc;

use crate::adapters::{AppConfig, FFmpegAdapter, FFprobeAdapter};
use crate::app::{ApplyInteractor, EditInteractor, ProbeInteractor};
use crate::domain::errors::DomainError;
use crate::domain::fields::EditSpecification;
use crate::ports::{ApplyPort, ProbePort};

pub trait AppContainer {
    fn probe_interactor(&self) -> Arc<ProbeInteractor>;
    fn apply_interactor(&self) -> Arc<ApplyInteractor>;
    fn edit_interactor(&self) -> Arc<EditInteractor>;
}

pub struct DefaultAppContainer {
    probe_interactor: Arc<ProbeInteractor>,
    apply_interactor: Arc<ApplyInteractor>,
    edit_interactor: Arc<EditInteractor>,
}

impl DefaultAppContainer {
    /// Wire the ffprobe/ffmpeg adapters named in the configuration
    pub fn new(config: &AppConfig) -> Result<Self, DomainError> {
        let probe_port: Arc<dyn ProbePort> = Arc::new(FFprobeAdapter::new(config.tools.ffprobe.clone()));
        let apply_port: Arc<dyn ApplyPort> = Arc::new(FFmpegAdapter::new(config.tools.ffmpeg.clone()));
        let tag_spec = EditSpecification::for_tags(&config.tags.required, &config.tags.suggested)?;
        Ok(Self::with_ports(probe_port, apply_port, tag_spec))
    }

    /// Wire arbitrary port implementations
    pub fn with_ports(
        probe_port: Arc<dyn ProbePort>,
        apply_port: Arc<dyn ApplyPort>,
        tag_spec: EditSpecification,
    ) -> Self {
        let probe_interactor = Arc::new(ProbeInteractor::new(Arc::clone(&probe_port)));
        let apply_interactor = Arc::new(ApplyInteractor::new(Arc::clone(&apply_port)));
        let edit_interactor = Arc::new(EditInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&apply_port),
            tag_spec,
        ));

        Self {
            probe_interactor,
            apply_interactor,
            edit_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn probe_interactor(&self) -> Arc<ProbeInteractor> {
        Arc::clone(&self.probe_interactor)
    }

    fn apply_interactor(&self) -> Arc<ApplyInteractor> {
        Arc::clone(&self.apply_interactor)
    }

    fn edit_interactor(&self) -> Arc<EditInteractor> {
        Arc::clone(&self.edit_interactor)
    }
}
