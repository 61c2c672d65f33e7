use std::fmt;
use std::time::Duration;

use crate::error::{CompositionError, Result};

/// Render a duration in the encoder's microsecond time syntax (`33333us`)
fn micros(duration: Duration) -> String {
    format!("{}us", duration.as_micros())
}

/// A single named transform step with its parameters
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Scale { width: u32, height: u32 },
    SetSar { num: u32, den: u32 },
    Trim { start: Option<Duration>, duration: Option<Duration> },
    SetPts(String),
    Volume(f64),
    /// Repeat buffered audio `loops` extra times; `size` is the buffer length in samples
    ALoop { loops: u32, size: u64 },
    ATrim { duration: Duration },
    APad { whole_duration: Duration },
    AMix { inputs: usize },
    Concat { segments: usize, video: usize, audio: usize },
}

impl Filter {
    /// Rebase presentation timestamps so the stream starts at zero
    pub fn rebase_pts() -> Self {
        Self::SetPts("PTS-STARTPTS".to_string())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Scale { .. } => "scale",
            Self::SetSar { .. } => "setsar",
            Self::Trim { .. } => "trim",
            Self::SetPts(_) => "setpts",
            Self::Volume(_) => "volume",
            Self::ALoop { .. } => "aloop",
            Self::ATrim { .. } => "atrim",
            Self::APad { .. } => "apad",
            Self::AMix { .. } => "amix",
            Self::Concat { .. } => "concat",
        }
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: String| -> Result<()> {
            Err(CompositionError::GraphConstruction { reason }.into())
        };

        match self {
            Self::Scale { width, height } if *width == 0 || *height == 0 => {
                invalid(format!("scale target {}x{} is empty", width, height))
            }
            Self::SetSar { num, den } if *num == 0 || *den == 0 => {
                invalid(format!("sample aspect ratio {}/{} is degenerate", num, den))
            }
            Self::Trim { start: None, duration: None } => {
                invalid("trim needs a start or a duration".to_string())
            }
            Self::Volume(v) if !v.is_finite() || *v < 0.0 => {
                invalid(format!("volume {} is not a usable gain", v))
            }
            Self::ALoop { size: 0, .. } => invalid("aloop buffer size is zero".to_string()),
            Self::AMix { inputs } if *inputs < 2 => {
                invalid(format!("amix needs at least two inputs, got {}", inputs))
            }
            Self::Concat { segments, .. } if *segments < 2 => {
                invalid(format!("concat needs at least two segments, got {}", segments))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scale { width, height } => write!(f, "scale={}:{}", width, height),
            Self::SetSar { num, den } => write!(f, "setsar={}/{}", num, den),
            Self::Trim { start, duration } => {
                let mut params = Vec::new();
                if let Some(start) = start {
                    params.push(format!("start={}", micros(*start)));
                }
                if let Some(duration) = duration {
                    params.push(format!("duration={}", micros(*duration)));
                }
                write!(f, "trim={}", params.join(":"))
            }
            Self::SetPts(expr) => write!(f, "setpts={}", expr),
            Self::Volume(v) => write!(f, "volume={}", v),
            Self::ALoop { loops, size } => write!(f, "aloop=loop={}:size={}", loops, size),
            Self::ATrim { duration } => write!(f, "atrim=duration={}", micros(*duration)),
            Self::APad { whole_duration } => write!(f, "apad=whole_dur={}", micros(*whole_duration)),
            Self::AMix { inputs } => write!(f, "amix=inputs={}", inputs),
            Self::Concat { segments, video, audio } => {
                write!(f, "concat=n={}:v={}:a={}", segments, video, audio)
            }
        }
    }
}

/// A linear run of filters from labelled input pads to one labelled output pad
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChain {
    pub inputs: Vec<String>,
    pub filters: Vec<Filter>,
    pub output: String,
}

impl FilterChain {
    pub fn new<I, S>(inputs: I, output: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            filters: Vec::new(),
            output: output.into(),
        }
    }

    /// Append a step to the chain
    pub fn then(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.iter().any(|f| f.name() == name)
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for input in &self.inputs {
            write!(f, "[{}]", input)?;
        }
        let steps: Vec<String> = self.filters.iter().map(ToString::to_string).collect();
        write!(f, "{}[{}]", steps.join(","), self.output)
    }
}

/// An ordered set of chains producing one final labelled stream
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterGraph {
    chains: Vec<FilterChain>,
}

impl FilterGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chain: FilterChain) {
        self.chains.push(chain);
    }

    pub fn chains(&self) -> &[FilterChain] {
        &self.chains
    }

    /// Label of the stream the graph finally produces
    pub fn output(&self) -> Option<&str> {
        self.chains.last().map(|c| c.output.as_str())
    }

    pub fn chain(&self, output: &str) -> Option<&FilterChain> {
        self.chains.iter().find(|c| c.output == output)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.chains.iter().any(|c| c.contains(name))
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Check every step and that each chain reads only inputs or earlier outputs
    pub fn validate(&self) -> Result<()> {
        if self.chains.is_empty() {
            return Err(CompositionError::GraphConstruction {
                reason: "filter graph has no chains".to_string(),
            }
            .into());
        }

        let mut produced: Vec<&str> = Vec::new();
        for chain in &self.chains {
            if chain.filters.is_empty() {
                return Err(CompositionError::GraphConstruction {
                    reason: format!("chain [{}] has no filters", chain.output),
                }
                .into());
            }
            for filter in &chain.filters {
                filter.validate()?;
            }
            for input in &chain.inputs {
                // Input pads look like "0:v"; intermediate pads are bare labels
                if !input.contains(':') && !produced.contains(&input.as_str()) {
                    return Err(CompositionError::GraphConstruction {
                        reason: format!("pad [{}] is used before it is produced", input),
                    }
                    .into());
                }
            }
            if produced.contains(&chain.output.as_str()) {
                return Err(CompositionError::GraphConstruction {
                    reason: format!("pad [{}] is produced twice", chain.output),
                }
                .into());
            }
            produced.push(&chain.output);
        }
        Ok(())
    }
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chains: Vec<String> = self.chains.iter().map(ToString::to_string).collect();
        write!(f, "{}", chains.join(";"))
    }
}
