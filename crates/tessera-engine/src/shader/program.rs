use crate::coords::Point;

use super::reflect::{ProgramBuilder, ProgramLayout, UniformHandle};
use super::BuildError;

/// Byte size of the `u_matrix` uniform: three `vec4`-padded columns.
pub const MATRIX_UNIFORM_SIZE: u64 = 48;
/// Byte size of the `u_color` uniform.
pub const COLOR_UNIFORM_SIZE: u64 = 16;

/// A linked vertex/fragment pair and the GPU layout objects derived from it.
///
/// Pipelines for individual topologies are created on demand with
/// [`ShaderProgram::create_pipeline`]; they share this program's layout.
pub struct ShaderProgram {
    layout: ProgramLayout,
    vertex_module: wgpu::ShaderModule,
    fragment_module: wgpu::ShaderModule,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
}

impl<'a> ProgramBuilder<'a> {
    /// Reflects both stages, then creates the shader modules and layouts.
    ///
    /// Nothing is created on the device unless reflection succeeds.
    pub fn build(&self, device: &wgpu::Device) -> Result<ShaderProgram, BuildError> {
        let layout = self.reflect()?;

        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} vertex", self.label)),
            source: wgpu::ShaderSource::Wgsl(self.vertex.into()),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} fragment", self.label)),
            source: wgpu::ShaderSource::Wgsl(self.fragment.into()),
        });

        let mut entries = [
            uniform_entry(layout.matrix, MATRIX_UNIFORM_SIZE),
            uniform_entry(layout.color, COLOR_UNIFORM_SIZE),
        ];
        entries.sort_by_key(|e| e.binding);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{} bgl", self.label)),
            entries: &entries,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} pipeline layout", self.label)),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        log::debug!(
            "{}: linked (a_position @{}, u_matrix @{}, u_color @{})",
            layout.label,
            layout.position,
            layout.matrix.binding,
            layout.color.binding
        );

        Ok(ShaderProgram {
            layout,
            vertex_module,
            fragment_module,
            bind_group_layout,
            pipeline_layout,
        })
    }
}

impl ShaderProgram {
    pub fn layout(&self) -> &ProgramLayout {
        &self.layout
    }

    /// Layout of the single bind group: `u_matrix` and `u_color`, both with
    /// dynamic offsets.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Creates a render pipeline for `topology` targeting `format`.
    ///
    /// Vertices are tightly packed [`Point`]s fed to `a_position`. Output is
    /// blended as premultiplied alpha.
    pub fn create_pipeline(
        &self,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        topology: wgpu::PrimitiveTopology,
    ) -> wgpu::RenderPipeline {
        let attributes = [wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: 0,
            shader_location: self.layout.position,
        }];
        let buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Point>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &attributes,
        }];

        let label = format!("{} {:?} pipeline", self.layout.label, topology);

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&label),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.vertex_module,
                entry_point: Some(&self.layout.vertex_entry),
                compilation_options: Default::default(),
                buffers: &buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.fragment_module,
                entry_point: Some(&self.layout.fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }

    /// Releases the modules and layouts. Pipelines created from this program
    /// keep their own references and must be dropped separately.
    pub fn release(self) {
        log::debug!("{}: released", self.layout.label);
    }
}

fn uniform_entry(handle: UniformHandle, size: u64) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: handle.binding,
        visibility: handle.visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: true,
            min_binding_size: wgpu::BufferSize::new(size),
        },
        count: None,
    }
}

fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}
