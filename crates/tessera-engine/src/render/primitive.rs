use crate::coords::Point;
use crate::geometry::{Mat3, Mesh};
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{Canvas, DrawList, MeshDraw, PrimitiveFamily, RenderMode, Topology};
use crate::shader::{
    sources, BuildError, ProgramBuilder, ShaderProgram, COLOR_UNIFORM_SIZE, MATRIX_UNIFORM_SIZE,
};

/// Draws points, polylines and triangle meshes for one surface.
///
/// Draw calls are recorded on the CPU and replayed by [`render`](Self::render),
/// which uploads every vertex once and gives each draw its own uniform slot.
/// All inputs are borrowed; nothing passed to a draw is modified.
pub struct PrimitiveRenderer {
    list: DrawList,

    line: ShaderProgram,
    triangle: ShaderProgram,

    pipeline_format: wgpu::TextureFormat,
    line_list: wgpu::RenderPipeline,
    line_strip: wgpu::RenderPipeline,
    triangle_list: wgpu::RenderPipeline,

    vertex_buffer: Option<wgpu::Buffer>,
    vertex_capacity: usize,

    /// Byte distance between uniform slots.
    slot_stride: u64,
    slot_capacity: usize,
    matrix_ubo: Option<wgpu::Buffer>,
    color_ubo: Option<wgpu::Buffer>,
    line_bind_group: Option<wgpu::BindGroup>,
    triangle_bind_group: Option<wgpu::BindGroup>,
}

impl PrimitiveRenderer {
    /// Builds both programs and their pipelines for `format`.
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Result<Self, BuildError> {
        let line = ProgramBuilder::new("line", sources::LINE_VERTEX, sources::LINE_FRAGMENT)
            .build(device)?;
        let triangle = ProgramBuilder::new(
            "triangle",
            sources::TRIANGLE_VERTEX,
            sources::TRIANGLE_FRAGMENT,
        )
        .build(device)?;

        let align = u64::from(device.limits().min_uniform_buffer_offset_alignment).max(1);
        let slot_stride = MATRIX_UNIFORM_SIZE.max(COLOR_UNIFORM_SIZE).div_ceil(align) * align;

        Ok(Self {
            list: DrawList::new(),
            line_list: line.create_pipeline(device, format, Topology::LineList.to_wgpu()),
            line_strip: line.create_pipeline(device, format, Topology::LineStrip.to_wgpu()),
            triangle_list: triangle.create_pipeline(
                device,
                format,
                Topology::TriangleList.to_wgpu(),
            ),
            line,
            triangle,
            pipeline_format: format,
            vertex_buffer: None,
            vertex_capacity: 0,
            slot_stride,
            slot_capacity: 0,
            matrix_ubo: None,
            color_ubo: None,
            line_bind_group: None,
            triangle_bind_group: None,
        })
    }

    /// Recorded draws for the current frame.
    #[inline]
    pub fn draw_list(&self) -> &DrawList {
        &self.list
    }

    /// Drops recorded draws; the next pass clears to [`Color::BACKGROUND`].
    #[inline]
    pub fn clear(&mut self) {
        self.list.clear();
    }

    /// Outline through `points` (closed back to the first point when `closed`)
    /// plus a marker per point.
    pub fn draw_polygon(&mut self, points: &[Point], closed: bool, color: Color, matrix: &Mat3) {
        self.list.push_polygon(points, closed, color, matrix);
    }

    /// Filled triangles of `mesh`. Out-of-range triangles are skipped and
    /// reported.
    pub fn draw_triangles(
        &mut self,
        mesh: &Mesh,
        vertices: &[Point],
        matrix: &Mat3,
        color: Color,
    ) -> MeshDraw {
        self.draw_mesh(mesh, vertices, matrix, color, RenderMode::Filled)
    }

    /// Edges of every valid triangle in `mesh` plus markers at its vertices.
    pub fn draw_wireframe(
        &mut self,
        mesh: &Mesh,
        vertices: &[Point],
        matrix: &Mat3,
        color: Color,
    ) -> MeshDraw {
        self.draw_mesh(mesh, vertices, matrix, color, RenderMode::Wireframe)
    }

    pub fn draw_mesh(
        &mut self,
        mesh: &Mesh,
        vertices: &[Point],
        matrix: &Mat3,
        color: Color,
        mode: RenderMode,
    ) -> MeshDraw {
        let draw = self.list.push_mesh(mesh, vertices, color, matrix, mode);
        if let Some(err) = &draw.integrity {
            log::warn!("mesh integrity: {err}");
        }
        draw
    }

    /// Uploads recorded vertices and uniforms, then encodes every draw in
    /// recording order into one pass over `target`.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        let clear = self.list.clear_color();
        if self.list.is_empty() && clear.is_none() {
            return;
        }

        self.ensure_pipelines(ctx);
        self.ensure_vertex_capacity(ctx, self.list.vertices().len());
        self.ensure_slots(ctx, self.list.cmds().len());
        self.write_uniforms(ctx);

        if let Some(vbo) = self.vertex_buffer.as_ref() {
            if !self.list.vertices().is_empty() {
                ctx.queue
                    .write_buffer(vbo, 0, bytemuck::cast_slice(self.list.vertices()));
            }
        }

        let load = match clear {
            Some(c) => wgpu::LoadOp::Clear(c.to_wgpu()),
            None => wgpu::LoadOp::Load,
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera primitive pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let Some(vbo) = self.vertex_buffer.as_ref() else { return };
        let (Some(line_bg), Some(triangle_bg)) =
            (self.line_bind_group.as_ref(), self.triangle_bind_group.as_ref())
        else {
            return;
        };

        for (slot, cmd) in self.list.cmds().iter().enumerate() {
            let offset = (slot as u64 * self.slot_stride) as u32;
            let pipeline = match cmd.topology {
                Topology::LineList => &self.line_list,
                Topology::LineStrip => &self.line_strip,
                Topology::TriangleList => &self.triangle_list,
            };
            let bind_group = match cmd.topology.family() {
                PrimitiveFamily::Line => line_bg,
                PrimitiveFamily::Triangle => triangle_bg,
            };

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, bind_group, &[offset, offset]);
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.draw(cmd.vertex_range(), 0..1);
        }

        log::trace!(
            "primitive pass: {} draws, {} vertices",
            self.list.cmds().len(),
            self.list.vertices().len()
        );
    }

    /// Destroys GPU buffers and releases both programs.
    pub fn release(self) {
        for buffer in [self.vertex_buffer, self.matrix_ubo, self.color_ubo]
            .into_iter()
            .flatten()
        {
            buffer.destroy();
        }
        self.line.release();
        self.triangle.release();
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == ctx.surface_format {
            return;
        }
        log::debug!("surface format changed to {:?}; rebuilding pipelines", ctx.surface_format);

        let format = ctx.surface_format;
        self.line_list = self.line.create_pipeline(ctx.device, format, Topology::LineList.to_wgpu());
        self.line_strip =
            self.line.create_pipeline(ctx.device, format, Topology::LineStrip.to_wgpu());
        self.triangle_list =
            self.triangle
                .create_pipeline(ctx.device, format, Topology::TriangleList.to_wgpu());
        self.pipeline_format = format;
    }

    fn ensure_vertex_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.vertex_capacity && self.vertex_buffer.is_some() {
            return;
        }

        let new_cap = required.next_power_of_two().max(256);
        let new_size = (new_cap * std::mem::size_of::<Point>()) as u64;

        self.vertex_buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessera primitive vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vertex_capacity = new_cap;
    }

    /// Grows both uniform buffers to hold `required` slots and rebinds them.
    fn ensure_slots(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.slot_capacity && self.matrix_ubo.is_some() {
            return;
        }

        let new_cap = required.next_power_of_two().max(16);
        let size = new_cap as u64 * self.slot_stride;
        let ubo = |label: &str| {
            ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let matrix_ubo = ubo("tessera matrix ubo");
        let color_ubo = ubo("tessera color ubo");

        self.line_bind_group = Some(bind_uniforms(ctx.device, &self.line, &matrix_ubo, &color_ubo));
        self.triangle_bind_group =
            Some(bind_uniforms(ctx.device, &self.triangle, &matrix_ubo, &color_ubo));
        self.matrix_ubo = Some(matrix_ubo);
        self.color_ubo = Some(color_ubo);
        self.slot_capacity = new_cap;
    }

    fn write_uniforms(&self, ctx: &RenderCtx<'_>) {
        let cmds = self.list.cmds();
        if cmds.is_empty() {
            return;
        }
        let (Some(matrix_ubo), Some(color_ubo)) = (self.matrix_ubo.as_ref(), self.color_ubo.as_ref())
        else {
            return;
        };

        let stride = self.slot_stride as usize;
        let mut matrices = vec![0u8; cmds.len() * stride];
        let mut colors = vec![0u8; cmds.len() * stride];
        for (i, cmd) in cmds.iter().enumerate() {
            let m = cmd.matrix.to_uniform();
            let c = cmd.color.to_array();
            let at = i * stride;
            matrices[at..at + MATRIX_UNIFORM_SIZE as usize].copy_from_slice(bytemuck::bytes_of(&m));
            colors[at..at + COLOR_UNIFORM_SIZE as usize].copy_from_slice(bytemuck::bytes_of(&c));
        }

        ctx.queue.write_buffer(matrix_ubo, 0, &matrices);
        ctx.queue.write_buffer(color_ubo, 0, &colors);
    }
}

impl Canvas for PrimitiveRenderer {
    fn clear(&mut self) {
        PrimitiveRenderer::clear(self);
    }

    fn draw_polygon(&mut self, points: &[Point], closed: bool, color: Color, matrix: &Mat3) {
        PrimitiveRenderer::draw_polygon(self, points, closed, color, matrix);
    }

    fn draw_mesh(
        &mut self,
        mesh: &Mesh,
        vertices: &[Point],
        matrix: &Mat3,
        color: Color,
        mode: RenderMode,
    ) -> MeshDraw {
        PrimitiveRenderer::draw_mesh(self, mesh, vertices, matrix, color, mode)
    }
}

fn bind_uniforms(
    device: &wgpu::Device,
    program: &ShaderProgram,
    matrix_ubo: &wgpu::Buffer,
    color_ubo: &wgpu::Buffer,
) -> wgpu::BindGroup {
    let layout = program.layout();

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("tessera {} bind group", layout.label)),
        layout: program.bind_group_layout(),
        entries: &[
            wgpu::BindGroupEntry {
                binding: layout.matrix.binding,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: matrix_ubo,
                    offset: 0,
                    size: wgpu::BufferSize::new(MATRIX_UNIFORM_SIZE),
                }),
            },
            wgpu::BindGroupEntry {
                binding: layout.color.binding,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: color_ubo,
                    offset: 0,
                    size: wgpu::BufferSize::new(COLOR_UNIFORM_SIZE),
                }),
            },
        ],
    })
}
