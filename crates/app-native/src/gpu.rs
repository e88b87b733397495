use app_core::mesh::{self, Mesh, MeshVertex};
use app_core::{Camera, InstanceRaw, OrnamentKind, TreeScene, POINT_SIZE_SCALE};
use wgpu::util::DeviceExt;
use winit::window::Window;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    group: [[f32; 4]; 4],
    eye: [f32; 4],
    viewport: [f32; 4],
    ambient: [f32; 4],
    spot_pos: [f32; 4],
    spot_color: [f32; 4],
    point_pos: [f32; 4],
    point_color: [f32; 4],
    background: [f32; 4],
}

// Per-particle data that never changes after generation.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct FoliageStatic {
    color_size: [f32; 4],
}

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const MESH_INSTANCE_ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
    6 => Float32x4,
];

struct MeshDraw {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
    // None for static pieces, which are uploaded once
    batch: Option<OrnamentKind>,
}

pub struct GpuState<'w> {
    pub window: &'w Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    foliage_pipeline: wgpu::RenderPipeline,
    mesh_pipeline: wgpu::RenderPipeline,
    foliage_positions: wgpu::Buffer,
    foliage_static: wgpu::Buffer,
    foliage_count: u32,
    meshes: Vec<MeshDraw>,
    clear_color: wgpu::Color,
    width: u32,
    height: u32,
}

impl<'w> GpuState<'w> {
    pub async fn new(window: &'w Window, scene: &TreeScene) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);
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
        log::info!("[gpu] adapter: {:?}", adapter.get_info().name);
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

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, width, height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(app_core::SCENE_WGSL.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let foliage_buffers = [
            // slot 0: animated positions
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 3) as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: color + size
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<FoliageStatic>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 0,
                    shader_location: 1,
                }],
            },
        ];
        let foliage_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("foliage_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_foliage"),
                buffers: &foliage_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            // sprites test against the meshes but never occlude each other
            depth_stencil: Some(depth_state(false)),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_foliage"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let mesh_buffers = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<MeshVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 12,
                        shader_location: 1,
                    },
                ],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<InstanceRaw>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &MESH_INSTANCE_ATTRS,
            },
        ];
        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_mesh"),
                buffers: &mesh_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(depth_state(true)),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_mesh"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let foliage_positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("foliage_positions"),
            contents: bytemuck::cast_slice(scene.foliage.positions()),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let statics: Vec<FoliageStatic> = scene
            .foliage
            .colors()
            .into_iter()
            .zip(scene.foliage.attributes().size.iter())
            .map(|(c, &s)| FoliageStatic {
                color_size: [c[0], c[1], c[2], s],
            })
            .collect();
        let foliage_static = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("foliage_static"),
            contents: bytemuck::cast_slice(&statics),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let mut meshes = Vec::new();
        for batch in scene.ornaments.batches() {
            let geometry = match batch.kind() {
                OrnamentKind::Box => mesh::cube(1.0),
                OrnamentKind::Ball => mesh::uv_sphere(1.0, 16, 16),
                OrnamentKind::Light => mesh::uv_sphere(0.5, 8, 8),
            };
            meshes.push(MeshDraw::new(
                &device,
                batch.kind().label(),
                &geometry,
                batch.instances(),
                Some(batch.kind()),
            ));
        }
        for piece in &scene.statics {
            meshes.push(MeshDraw::new(
                &device,
                piece.name,
                &piece.mesh,
                &[piece.instance()],
                None,
            ));
        }

        let bg = scene.lighting.background;
        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            depth_view,
            uniform_buffer,
            bind_group,
            foliage_pipeline,
            mesh_pipeline,
            foliage_positions,
            foliage_static,
            foliage_count: scene.foliage.len() as u32,
            meshes,
            clear_color: wgpu::Color {
                r: bg[0] as f64,
                g: bg[1] as f64,
                b: bg[2] as f64,
                a: 1.0,
            },
            width,
            height,
        })
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
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

    /// Upload whatever the fields changed this tick, then draw.
    pub fn render(
        &mut self,
        scene: &mut TreeScene,
        camera: &Camera,
        time: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        if scene.foliage.take_dirty() {
            self.queue.write_buffer(
                &self.foliage_positions,
                0,
                bytemuck::cast_slice(scene.foliage.positions()),
            );
        }
        if scene.ornaments.take_dirty() {
            for draw in &self.meshes {
                if let Some(kind) = draw.batch {
                    let instances = scene.ornaments.batch(kind).instances();
                    if !instances.is_empty() {
                        self.queue.write_buffer(
                            &draw.instance_buffer,
                            0,
                            bytemuck::cast_slice(instances),
                        );
                    }
                }
            }
        }

        let light = &scene.lighting;
        let globals = Globals {
            view_proj: camera.view_proj().to_cols_array_2d(),
            group: scene.group_transform().to_cols_array_2d(),
            eye: camera.eye.extend(1.0).to_array(),
            viewport: [
                self.width as f32,
                self.height as f32,
                POINT_SIZE_SCALE,
                time,
            ],
            ambient: [light.ambient, light.ambient, light.ambient, 1.0],
            spot_pos: light.spot_position.extend(1.0).to_array(),
            spot_color: with_w(light.spot_color, light.spot_intensity),
            point_pos: light.point_position.extend(1.0).to_array(),
            point_color: with_w(light.point_color, light.point_intensity),
            background: with_w(light.background, 1.0),
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&globals));

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
                        load: wgpu::LoadOp::Clear(self.clear_color),
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
            rpass.set_bind_group(0, &self.bind_group, &[]);

            // opaque meshes first, then the blended sprites on top
            rpass.set_pipeline(&self.mesh_pipeline);
            for draw in &self.meshes {
                if draw.instance_count == 0 {
                    continue;
                }
                rpass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
                rpass.set_vertex_buffer(1, draw.instance_buffer.slice(..));
                rpass.set_index_buffer(draw.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..draw.index_count, 0, 0..draw.instance_count);
            }

            if self.foliage_count > 0 {
                rpass.set_pipeline(&self.foliage_pipeline);
                rpass.set_vertex_buffer(0, self.foliage_positions.slice(..));
                rpass.set_vertex_buffer(1, self.foliage_static.slice(..));
                rpass.draw(0..6, 0..self.foliage_count);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl MeshDraw {
    fn new(
        device: &wgpu::Device,
        label: &str,
        geometry: &Mesh,
        instances: &[InstanceRaw],
        batch: Option<OrnamentKind>,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        // Fixed capacity: one slot per batch member, never resized.
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (std::mem::size_of::<InstanceRaw>() * instances.len().max(1)) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: true,
        });
        if !instances.is_empty() {
            let bytes: &[u8] = bytemuck::cast_slice(instances);
            instance_buffer.slice(..).get_mapped_range_mut()[..bytes.len()].copy_from_slice(bytes);
        }
        instance_buffer.unmap();
        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
            instance_buffer,
            instance_count: instances.len() as u32,
            batch,
        }
    }
}

fn depth_state(write: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
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
    });
    tex.create_view(&wgpu::TextureViewDescriptor::default())
}

#[inline]
fn with_w(rgb: [f32; 3], w: f32) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], w]
}
