use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use xr_core::draw::{DrawItem, MeshKey, Pass};
use xr_core::mesh::{MeshData, Vertex};
use xr_core::model::ControllerModel;
use xr_core::{ControllerId, PixelBuffer, SceneConfig};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;
// Per-draw uniform slots are spaced by the minimum dynamic offset alignment.
const DRAW_STRIDE: u64 = 256;
const INITIAL_DRAW_SLOTS: usize = 64;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    light_dir: [f32; 4],
    ambient: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct DrawUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    emissive: [f32; 4],
}

struct GpuMesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn new(device: &wgpu::Device, label: &str, mesh: &MeshData) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.interleaved()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertices,
            indices,
            index_count: mesh.indices.len() as u32,
        }
    }
}

pub struct GpuState<'w> {
    pub window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    solid_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    panel_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    draw_layout: wgpu::BindGroupLayout,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_slots: usize,
    panel_texture: wgpu::Texture,
    panel_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    panel_mesh: GpuMesh,
    quad_mesh: GpuMesh,
    cube_mesh: GpuMesh,
    line_mesh: GpuMesh,
    controller_models: Vec<(ControllerId, GpuMesh)>,
    clear: wgpu::Color,
    light_dir: Vec3,
    ambient: Vec3,
    pub width: u32,
    pub height: u32,
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("depth"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}

fn uniform_entry(binding: u32, dynamic: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: dynamic,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_draw_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    slots: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("draw_uniforms"),
        size: DRAW_STRIDE * slots as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("draw_bg"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniforms>() as u64),
            }),
        }],
    });
    (buffer, bind_group)
}

impl<'w> GpuState<'w> {
    pub async fn new(window: &'w winit::window::Window, scene: &SceneConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/scene.wgsl").into()),
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[uniform_entry(0, false)],
        });
        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_bgl"),
            entries: &[uniform_entry(0, true)],
        });
        let panel_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("panel_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });
        let (draw_buffer, draw_bind_group) =
            create_draw_buffer(&device, &draw_layout, INITIAL_DRAW_SLOTS);

        let panel_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("panel"),
            size: wgpu::Extent3d {
                width: scene.buffer_width,
                height: scene.buffer_height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let panel_view = panel_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("panel_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let panel_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("panel_bg"),
            layout: &panel_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&panel_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let solid_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("solid_pl"),
            bind_group_layouts: &[&globals_layout, &draw_layout],
            push_constant_ranges: &[],
        });
        let panel_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("panel_pl"),
            bind_group_layouts: &[&globals_layout, &draw_layout, &panel_layout],
            push_constant_ranges: &[],
        });

        let vertex_layout = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2],
        }];
        let make_pipeline = |label: &str,
                             layout: &wgpu::PipelineLayout,
                             fs: &str,
                             topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &vertex_layout,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fs),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                cache: None,
                multiview: None,
            })
        };
        let solid_pipeline = make_pipeline(
            "solid",
            &solid_layout,
            "fs_solid",
            wgpu::PrimitiveTopology::TriangleList,
        );
        let line_pipeline = make_pipeline(
            "line",
            &solid_layout,
            "fs_solid",
            wgpu::PrimitiveTopology::LineList,
        );
        let panel_pipeline = make_pipeline(
            "panel",
            &panel_pl,
            "fs_panel",
            wgpu::PrimitiveTopology::TriangleList,
        );

        let panel_mesh = GpuMesh::new(
            &device,
            "panel_mesh",
            &MeshData::quad(scene.panel_width, scene.panel_height),
        );
        let quad_mesh = GpuMesh::new(&device, "quad_mesh", &MeshData::quad(1.0, 1.0));
        let cube_mesh = GpuMesh::new(&device, "cube_mesh", &MeshData::cuboid(Vec3::ONE));
        let line_mesh = GpuMesh::new(&device, "line_mesh", &MeshData::line(Vec3::ZERO, Vec3::NEG_Z));

        let depth_view = create_depth_view(&device, config.width, config.height);
        let bg = scene.background;
        Ok(Self {
            window,
            surface,
            device,
            queue,
            solid_pipeline,
            line_pipeline,
            panel_pipeline,
            globals_buffer,
            globals_bind_group,
            draw_layout,
            draw_buffer,
            draw_bind_group,
            draw_slots: INITIAL_DRAW_SLOTS,
            panel_texture,
            panel_bind_group,
            depth_view,
            panel_mesh,
            quad_mesh,
            cube_mesh,
            line_mesh,
            controller_models: Vec::new(),
            clear: wgpu::Color {
                r: bg.x as f64,
                g: bg.y as f64,
                b: bg.z as f64,
                a: 1.0,
            },
            light_dir: scene.light_direction.normalize_or_zero(),
            ambient: scene.ambient,
            width: config.width,
            height: config.height,
            config,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, self.width, self.height);
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn set_controller_model(&mut self, id: ControllerId, model: &ControllerModel) {
        let mesh = GpuMesh::new(&self.device, "controller_model", &model.mesh);
        self.controller_models.retain(|(i, _)| *i != id);
        self.controller_models.push((id, mesh));
    }

    /// Copy the pixel buffer to the panel texture if it changed.
    pub fn sync_panel(&self, buffer: &mut PixelBuffer) {
        if !buffer.take_dirty() {
            return;
        }
        let (width, height) = (buffer.width(), buffer.height());
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.panel_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            buffer.as_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }

    fn ensure_draw_slots(&mut self, needed: usize) {
        if needed <= self.draw_slots {
            return;
        }
        let slots = needed.next_power_of_two();
        let (buffer, bind_group) = create_draw_buffer(&self.device, &self.draw_layout, slots);
        self.draw_buffer = buffer;
        self.draw_bind_group = bind_group;
        self.draw_slots = slots;
        log::debug!("[gpu] draw uniform slots grown to {}", slots);
    }

    fn mesh_for(&self, key: MeshKey) -> Option<&GpuMesh> {
        match key {
            MeshKey::Panel => Some(&self.panel_mesh),
            MeshKey::Quad => Some(&self.quad_mesh),
            MeshKey::Cube => Some(&self.cube_mesh),
            MeshKey::Line => Some(&self.line_mesh),
            MeshKey::ControllerModel(id) => self
                .controller_models
                .iter()
                .find(|(i, _)| *i == id)
                .map(|(_, m)| m),
        }
    }

    pub fn render(&mut self, view_proj: Mat4, items: &[DrawItem]) -> Result<(), wgpu::SurfaceError> {
        self.ensure_draw_slots(items.len());
        self.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals {
                view_proj: view_proj.to_cols_array_2d(),
                light_dir: self.light_dir.extend(0.0).to_array(),
                ambient: self.ambient.extend(1.0).to_array(),
            }),
        );
        let mut staging = vec![0u8; DRAW_STRIDE as usize * items.len()];
        for (i, item) in items.iter().enumerate() {
            let uniforms = DrawUniforms {
                model: item.model.to_cols_array_2d(),
                color: item.color.to_array(),
                emissive: item.emissive.extend(if item.lit { 1.0 } else { 0.0 }).to_array(),
            };
            let start = i * DRAW_STRIDE as usize;
            staging[start..start + std::mem::size_of::<DrawUniforms>()]
                .copy_from_slice(bytemuck::bytes_of(&uniforms));
        }
        if !staging.is_empty() {
            self.queue.write_buffer(&self.draw_buffer, 0, &staging);
        }

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.globals_bind_group, &[]);
            for (i, item) in items.iter().enumerate() {
                let Some(mesh) = self.mesh_for(item.mesh) else {
                    continue;
                };
                match item.pass {
                    Pass::Panel => {
                        rpass.set_pipeline(&self.panel_pipeline);
                        rpass.set_bind_group(2, &self.panel_bind_group, &[]);
                    }
                    Pass::Solid => rpass.set_pipeline(&self.solid_pipeline),
                    Pass::Line => rpass.set_pipeline(&self.line_pipeline),
                }
                let offset = (i as u64 * DRAW_STRIDE) as u32;
                rpass.set_bind_group(1, &self.draw_bind_group, &[offset]);
                rpass.set_vertex_buffer(0, mesh.vertices.slice(..));
                rpass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
