#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Loaded,
    Failed,
    TimedOut,
}

impl ProbeOutcome {
    pub fn label(self) -> &'static str {
        match self {
            ProbeOutcome::Loaded => "loaded",
            ProbeOutcome::Failed => "failed",
            ProbeOutcome::TimedOut => "timed_out",
        }
    }
}

/// Loads a candidate image URL the way a browser `<img>` would, reporting
/// exactly one terminal outcome per call.
pub trait ImageProbe {
    fn probe_name(&self) -> &'static str;
    fn probe(&self, url: &str) -> ProbeOutcome;
}

impl<P: ImageProbe + ?Sized> ImageProbe for &P {
    fn probe_name(&self) -> &'static str {
        (**self).probe_name()
    }

    fn probe(&self, url: &str) -> ProbeOutcome {
        (**self).probe(url)
    }
}
