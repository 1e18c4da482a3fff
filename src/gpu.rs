//! wgpu rendering of the frame mesh.
//!
//! Two instanced pipelines, both fed from [`FrameMesh`]: circles (a quad
//! per instance, radial gradient in the fragment shader) and lines (a quad
//! per segment, width expanded in the vertex shader). Instance buffers are
//! rewritten every frame and grown on demand; nothing else on the GPU side
//! changes after setup.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use winit::window::Window;

use crate::error::GpuError;
use crate::mesh::{CircleInstance, FrameMesh, LineInstance};
use crate::visuals::{BlendMode, VisualConfig};

const SHADER_SOURCE: &str = r#"
struct Uniforms {
    screen: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

fn to_clip(p: vec2<f32>) -> vec4<f32> {
    let ndc = vec2<f32>(
        p.x / uniforms.screen.x * 2.0 - 1.0,
        1.0 - p.y / uniforms.screen.y * 2.0,
    );
    return vec4<f32>(ndc, 0.0, 1.0);
}

struct CircleOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) inner_color: vec4<f32>,
    @location(2) outer_color: vec4<f32>,
};

@vertex
fn vs_circle(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) center: vec2<f32>,
    @location(1) radius: f32,
    @location(2) inner_color: vec4<f32>,
    @location(3) outer_color: vec4<f32>,
) -> CircleOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );
    let corner = corners[vertex_index];

    var out: CircleOutput;
    out.clip_position = to_clip(center + corner * radius);
    out.uv = corner;
    out.inner_color = inner_color;
    out.outer_color = outer_color;
    return out;
}

@fragment
fn fs_circle(in: CircleOutput) -> @location(0) vec4<f32> {
    let dist = length(in.uv);
    if dist > 1.0 {
        discard;
    }
    if dist < 0.4 {
        return mix(in.inner_color, in.outer_color, dist / 0.4);
    }
    let fade = 1.0 - (dist - 0.4) / 0.6;
    return vec4<f32>(in.outer_color.rgb, in.outer_color.a * fade);
}

struct LineOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_line(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) a: vec2<f32>,
    @location(1) b: vec2<f32>,
    @location(2) width: f32,
    @location(3) color: vec4<f32>,
) -> LineOutput {
    let dir = b - a;
    let len = max(length(dir), 1e-4);
    let normal = vec2<f32>(-dir.y, dir.x) / len * width * 0.5;

    var positions = array<vec2<f32>, 6>(
        a - normal,
        b - normal,
        a + normal,
        a + normal,
        b - normal,
        b + normal,
    );

    var out: LineOutput;
    out.clip_position = to_clip(positions[vertex_index]);
    out.color = color;
    return out;
}

@fragment
fn fs_line(in: LineOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    screen: [f32; 2],
    _pad: [f32; 2],
}

fn blend_state(mode: BlendMode) -> wgpu::BlendState {
    match mode {
        BlendMode::Alpha => wgpu::BlendState::ALPHA_BLENDING,
        BlendMode::Additive => wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        },
    }
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    circle_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    circle_buffer: wgpu::Buffer,
    circle_capacity: usize,
    line_buffer: wgpu::Buffer,
    line_capacity: usize,
    background: wgpu::Color,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, visuals: &VisualConfig) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        if config.width > 0 && config.height > 0 {
            surface.configure(&device, &config);
        }

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Field Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let uniforms = Uniforms {
            screen: [size.width.max(1) as f32, size.height.max(1) as f32],
            _pad: [0.0; 2],
        };
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Uniform Buffer"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let blend = blend_state(visuals.blend_mode);
        let target = [Some(wgpu::ColorTargetState {
            format: config.format,
            blend: Some(blend),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        // Offsets are written out by hand: radius is followed by explicit
        // padding in the struct, which tight packing would miss.
        let circle_attributes = [
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32,
                offset: 8,
                shader_location: 1,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 16,
                shader_location: 2,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 32,
                shader_location: 3,
            },
        ];
        let circle_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CircleInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &circle_attributes,
        };

        let line_attributes = [
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 8,
                shader_location: 1,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32,
                offset: 16,
                shader_location: 2,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 24,
                shader_location: 3,
            },
        ];
        let line_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &line_attributes,
        };

        let circle_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            "vs_circle",
            "fs_circle",
            circle_layout,
            &target,
            "Circle Pipeline",
        );
        let line_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            "vs_line",
            "fs_line",
            line_layout,
            &target,
            "Line Pipeline",
        );

        let circle_capacity = 1024;
        let circle_buffer = create_instance_buffer::<CircleInstance>(
            &device,
            "Circle Instance Buffer",
            circle_capacity,
        );
        let line_capacity = 4096;
        let line_buffer =
            create_instance_buffer::<LineInstance>(&device, "Line Instance Buffer", line_capacity);

        let [r, g, b] = visuals.background.to_array();
        let background = wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        };

        Ok(Self {
            surface,
            device,
            queue,
            config,
            circle_pipeline,
            line_pipeline,
            uniform_buffer,
            uniform_bind_group,
            circle_buffer,
            circle_capacity,
            line_buffer,
            line_capacity,
            background,
        })
    }

    pub fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);

        let uniforms = Uniforms {
            screen: [size.width as f32, size.height as f32],
            _pad: [0.0; 2],
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Draw one frame. Surface errors propagate so the caller can decide
    /// between reconfiguring and skipping the frame.
    pub fn render(&mut self, mesh: &FrameMesh) -> Result<(), wgpu::SurfaceError> {
        if self.config.width == 0 || self.config.height == 0 {
            // Surface not usable yet; skip the frame, the next redraw
            // retries naturally.
            return Ok(());
        }

        self.upload(mesh);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Field Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            if !mesh.circles.is_empty() {
                render_pass.set_pipeline(&self.circle_pipeline);
                render_pass.set_vertex_buffer(0, self.circle_buffer.slice(..));
                render_pass.draw(0..6, 0..mesh.circles.len() as u32);
            }
            if !mesh.lines.is_empty() {
                render_pass.set_pipeline(&self.line_pipeline);
                render_pass.set_vertex_buffer(0, self.line_buffer.slice(..));
                render_pass.draw(0..6, 0..mesh.lines.len() as u32);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn upload(&mut self, mesh: &FrameMesh) {
        if mesh.circles.len() > self.circle_capacity {
            self.circle_capacity = mesh.circles.len().next_power_of_two();
            self.circle_buffer = create_instance_buffer::<CircleInstance>(
                &self.device,
                "Circle Instance Buffer",
                self.circle_capacity,
            );
        }
        if !mesh.circles.is_empty() {
            self.queue
                .write_buffer(&self.circle_buffer, 0, bytemuck::cast_slice(&mesh.circles));
        }

        if mesh.lines.len() > self.line_capacity {
            self.line_capacity = mesh.lines.len().next_power_of_two();
            self.line_buffer = create_instance_buffer::<LineInstance>(
                &self.device,
                "Line Instance Buffer",
                self.line_capacity,
            );
        }
        if !mesh.lines.is_empty() {
            self.queue
                .write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(&mesh.lines));
        }
    }
}

fn create_instance_buffer<T>(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (capacity * std::mem::size_of::<T>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[allow(clippy::too_many_arguments)]
fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    vs_entry: &str,
    fs_entry: &str,
    vertex_layout: wgpu::VertexBufferLayout,
    targets: &[Option<wgpu::ColorTargetState>],
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs_entry),
            compilation_options: Default::default(),
            buffers: &[vertex_layout],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs_entry),
            compilation_options: Default::default(),
            targets,
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
