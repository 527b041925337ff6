//! Compiled runtime effects and the cache that shares them between elements.

use crate::sksl::ShaderSource;
use glass_core::{GlassError, Result, ShaderKind, UniformSet};
use skia_safe::{runtime_effect::RuntimeShaderBuilder, RuntimeEffect, Shader};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

/// A generated source together with its compiled effect.
pub struct ShaderProgram {
    source: ShaderSource,
    effect: RuntimeEffect,
}

impl ShaderProgram {
    /// Compiles `source`. Failure is fatal for the element that needs it.
    pub fn compile(source: ShaderSource) -> Result<Self> {
        match RuntimeEffect::make_for_shader(&source.text, None) {
            Ok(effect) => Ok(Self { source, effect }),
            Err(message) => {
                error!("{} shader compilation error: {}", source.kind, message);
                Err(GlassError::ShaderCompilation {
                    kind: source.kind,
                    message,
                })
            }
        }
    }

    pub fn kind(&self) -> ShaderKind {
        self.source.kind
    }

    pub fn source(&self) -> &ShaderSource {
        &self.source
    }

    /// Binds `uniforms` and instantiates the shader.
    pub fn make_shader(&self, uniforms: &UniformSet) -> Result<Shader> {
        let mut builder = RuntimeShaderBuilder::new(self.effect.clone());
        for (name, values) in uniforms.entries() {
            builder.set_uniform_float(name, &values).map_err(|e| {
                GlassError::FilterGraph(format!(
                    "binding uniform '{}' on {} shader: {:?}",
                    name, self.source.kind, e
                ))
            })?;
        }
        builder.make_shader(None).ok_or_else(|| {
            GlassError::FilterGraph(format!(
                "{} shader rejected its uniforms",
                self.source.kind
            ))
        })
    }
}

/// Programs are equal when their sources are; the compiled handle is derived.
impl PartialEq for ShaderProgram {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("kind", &self.source.kind)
            .field("len", &self.source.text.len())
            .finish()
    }
}

/// Compiled programs keyed by source text.
///
/// Cloning the cache shares it; elements with equal shape parameters reuse a
/// single compilation. Entries are never evicted: every distinct radius or
/// segment layout keeps its program for the lifetime of the cache, so drop
/// the cache (or start a fresh one) when shapes animate continuously.
#[derive(Clone, Default)]
pub struct ShaderCache {
    programs: Arc<Mutex<HashMap<String, Arc<ShaderProgram>>>>,
    compilations: Arc<AtomicUsize>,
}

impl ShaderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compile(&self, source: ShaderSource) -> Result<Arc<ShaderProgram>> {
        let mut programs = self
            .programs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(program) = programs.get(&source.text) {
            debug!(kind = %source.kind, "shader cache hit");
            return Ok(program.clone());
        }
        debug!(kind = %source.kind, "compiling shader");
        let key = source.text.clone();
        let program = Arc::new(ShaderProgram::compile(source)?);
        self.compilations.fetch_add(1, Ordering::Relaxed);
        programs.insert(key, program.clone());
        Ok(program)
    }

    /// Number of successful compilations performed through this cache.
    pub fn compilations(&self) -> usize {
        self.compilations.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.programs
            .lock()
            .map(|p| p.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ShaderCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderCache")
            .field("programs", &self.len())
            .field("compilations", &self.compilations())
            .finish()
    }
}
