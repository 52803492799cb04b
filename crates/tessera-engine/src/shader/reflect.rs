use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{AddressSpace, Binding, FunctionArgument, Handle, Module, ShaderStage, Type, TypeInner};

use super::{BuildError, HandleKind, Stage};

pub const POSITION_ATTRIBUTE: &str = "a_position";
pub const MATRIX_UNIFORM: &str = "u_matrix";
pub const COLOR_UNIFORM: &str = "u_color";

/// Resolved binding of a uniform declared by one or both stages.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformHandle {
    pub group: u32,
    pub binding: u32,
    pub visibility: wgpu::ShaderStages,
}

/// Handles resolved from a compiled and linked vertex/fragment pair.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ProgramLayout {
    pub label: String,
    pub vertex_entry: String,
    pub fragment_entry: String,
    /// Shader location of `a_position`.
    pub position: u32,
    pub matrix: UniformHandle,
    pub color: UniformHandle,
}

/// Compiles a WGSL vertex/fragment pair and resolves its handles.
///
/// `reflect` is CPU-only; `build` (see `program.rs`) additionally creates the
/// GPU objects.
#[derive(Debug, Copy, Clone)]
pub struct ProgramBuilder<'a> {
    pub(super) label: &'a str,
    pub(super) vertex: &'a str,
    pub(super) fragment: &'a str,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(label: &'a str, vertex: &'a str, fragment: &'a str) -> Self {
        Self { label, vertex, fragment }
    }

    /// Compiles both stages, checks the interface between them, and resolves
    /// `a_position`, `u_matrix` and `u_color`.
    pub fn reflect(&self) -> Result<ProgramLayout, BuildError> {
        let vs = self.compile(Stage::Vertex, self.vertex)?;
        let fs = self.compile(Stage::Fragment, self.fragment)?;

        let vertex_ep = vs
            .entry_points
            .iter()
            .find(|ep| ep.stage == ShaderStage::Vertex)
            .ok_or_else(|| self.missing(Stage::Vertex, "@vertex", HandleKind::EntryPoint))?;
        let fragment_ep = fs
            .entry_points
            .iter()
            .find(|ep| ep.stage == ShaderStage::Fragment)
            .ok_or_else(|| self.missing(Stage::Fragment, "@fragment", HandleKind::EntryPoint))?;

        let (position, position_ty) =
            find_input(&vs, &vertex_ep.function.arguments, POSITION_ATTRIBUTE).ok_or_else(|| {
                self.missing(Stage::Vertex, POSITION_ATTRIBUTE, HandleKind::Attribute)
            })?;
        if !is_vector(&vs.types[position_ty].inner, naga::VectorSize::Bi) {
            return Err(self.wrong_type(POSITION_ATTRIBUTE, "vec2<f32>"));
        }

        // Fragment inputs must all be produced by the vertex stage.
        let produced = vertex_outputs(&vs, vertex_ep.function.result.as_ref());
        for location in locations(&fs, &fragment_ep.function.arguments) {
            if !produced.contains(&location) {
                return Err(BuildError::Link {
                    program: self.label.to_string(),
                    reason: format!(
                        "fragment input @location({location}) is not written by the vertex stage"
                    ),
                });
            }
        }

        let matrix = self.resolve_uniform(&vs, &fs, MATRIX_UNIFORM, Stage::Vertex, |inner| {
            is_mat3(inner).then_some(()).ok_or("mat3x3<f32>")
        })?;
        let color = self.resolve_uniform(&vs, &fs, COLOR_UNIFORM, Stage::Fragment, |inner| {
            is_vector(inner, naga::VectorSize::Quad).then_some(()).ok_or("vec4<f32>")
        })?;

        if matrix.group != 0 || color.group != 0 {
            return Err(self.link_error("uniforms must be declared in @group(0)"));
        }
        if matrix.binding == color.binding {
            return Err(self.link_error(format!(
                "`{MATRIX_UNIFORM}` and `{COLOR_UNIFORM}` share @binding({})",
                matrix.binding
            )));
        }

        Ok(ProgramLayout {
            label: self.label.to_string(),
            vertex_entry: vertex_ep.name.clone(),
            fragment_entry: fragment_ep.name.clone(),
            position,
            matrix,
            color,
        })
    }

    fn compile(&self, stage: Stage, source: &str) -> Result<Module, BuildError> {
        let module = naga::front::wgsl::parse_str(source).map_err(|e| BuildError::Compile {
            program: self.label.to_string(),
            stage,
            diagnostic: e.emit_to_string(source),
        })?;

        Validator::new(ValidationFlags::all(), Capabilities::default())
            .validate(&module)
            .map_err(|e| BuildError::Compile {
                program: self.label.to_string(),
                stage,
                diagnostic: e.emit_to_string(source),
            })?;

        log::debug!("{}: {stage} stage compiled", self.label);
        Ok(module)
    }

    /// Finds `name` in either stage. `home` is the stage that must declare it.
    fn resolve_uniform(
        &self,
        vs: &Module,
        fs: &Module,
        name: &'static str,
        home: Stage,
        check: impl Fn(&TypeInner) -> Result<(), &'static str>,
    ) -> Result<UniformHandle, BuildError> {
        let in_vs = find_uniform(vs, name);
        let in_fs = find_uniform(fs, name);

        let mut handle: Option<UniformHandle> = None;
        for (found, module, stage_flag) in [
            (in_vs, vs, wgpu::ShaderStages::VERTEX),
            (in_fs, fs, wgpu::ShaderStages::FRAGMENT),
        ] {
            let Some((binding, ty)) = found else { continue };
            check(&module.types[ty].inner).map_err(|expected| self.wrong_type(name, expected))?;
            match handle.as_mut() {
                None => {
                    handle = Some(UniformHandle {
                        group: binding.group,
                        binding: binding.binding,
                        visibility: stage_flag,
                    });
                }
                Some(h) if h.group == binding.group && h.binding == binding.binding => {
                    h.visibility |= stage_flag;
                }
                Some(h) => {
                    return Err(self.link_error(format!(
                        "`{name}` is bound at @group({}) @binding({}) in the vertex stage but \
                         @group({}) @binding({}) in the fragment stage",
                        h.group, h.binding, binding.group, binding.binding
                    )));
                }
            }
        }

        handle.ok_or_else(|| self.missing(home, name, HandleKind::Uniform))
    }

    fn missing(&self, stage: Stage, name: &'static str, kind: HandleKind) -> BuildError {
        BuildError::MissingHandle {
            program: self.label.to_string(),
            stage,
            name,
            kind,
        }
    }

    fn wrong_type(&self, name: &'static str, expected: &'static str) -> BuildError {
        BuildError::HandleType {
            program: self.label.to_string(),
            name,
            expected,
        }
    }

    fn link_error(&self, reason: impl Into<String>) -> BuildError {
        BuildError::Link {
            program: self.label.to_string(),
            reason: reason.into(),
        }
    }
}

fn is_vector(inner: &TypeInner, want: naga::VectorSize) -> bool {
    matches!(inner, TypeInner::Vector { size, scalar } if *size == want && *scalar == naga::Scalar::F32)
}

fn is_mat3(inner: &TypeInner) -> bool {
    matches!(
        inner,
        TypeInner::Matrix { columns, rows, scalar }
            if *columns == naga::VectorSize::Tri
                && *rows == naga::VectorSize::Tri
                && *scalar == naga::Scalar::F32
    )
}

fn find_uniform(module: &Module, name: &str) -> Option<(naga::ResourceBinding, Handle<Type>)> {
    module.global_variables.iter().find_map(|(_, var)| {
        if var.space != AddressSpace::Uniform || var.name.as_deref() != Some(name) {
            return None;
        }
        var.binding.clone().map(|b| (b, var.ty))
    })
}

/// Location-bound input named `name`, either a direct argument or a member of
/// a struct argument.
fn find_input(module: &Module, args: &[FunctionArgument], name: &str) -> Option<(u32, Handle<Type>)> {
    for arg in args {
        match &arg.binding {
            Some(Binding::Location { location, .. }) if arg.name.as_deref() == Some(name) => {
                return Some((*location, arg.ty));
            }
            Some(_) => {}
            None => {
                if let TypeInner::Struct { members, .. } = &module.types[arg.ty].inner {
                    for m in members {
                        if let (Some(Binding::Location { location, .. }), Some(n)) =
                            (&m.binding, m.name.as_deref())
                        {
                            if n == name {
                                return Some((*location, m.ty));
                            }
                        }
                    }
                }
            }
        }
    }
    None
}

fn locations(module: &Module, args: &[FunctionArgument]) -> Vec<u32> {
    let mut out = Vec::new();
    for arg in args {
        collect_locations(module, arg.binding.as_ref(), arg.ty, &mut out);
    }
    out
}

fn vertex_outputs(module: &Module, result: Option<&naga::FunctionResult>) -> Vec<u32> {
    let mut out = Vec::new();
    if let Some(result) = result {
        collect_locations(module, result.binding.as_ref(), result.ty, &mut out);
    }
    out
}

fn collect_locations(module: &Module, binding: Option<&Binding>, ty: Handle<Type>, out: &mut Vec<u32>) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push(*location),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    if let Some(Binding::Location { location, .. }) = &m.binding {
                        out.push(*location);
                    }
                }
            }
        }
    }
}
