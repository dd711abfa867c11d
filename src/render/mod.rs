use glam::{Mat4, Vec3};
use web_sys::{
    WebGl2RenderingContext as Gl, WebGlFramebuffer, WebGlProgram, WebGlTexture,
    WebGlUniformLocation, WebGlVertexArrayObject,
};
use xr_core::mesh::MeshData;
use xr_core::model::ControllerModel;
use xr_core::{ControllerId, PixelBuffer, SceneConfig};

use xr_core::draw::{DrawItem, MeshKey, Pass};

mod helpers;

static SCENE_VERT: &str = include_str!("../../shaders/scene.vert");
static SOLID_FRAG: &str = include_str!("../../shaders/solid.frag");
static PANEL_FRAG: &str = include_str!("../../shaders/panel.frag");

pub struct GpuMesh {
    vao: WebGlVertexArrayObject,
    index_count: i32,
    mode: u32,
}

struct SolidProgram {
    program: WebGlProgram,
    view_proj: Option<WebGlUniformLocation>,
    model: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    emissive: Option<WebGlUniformLocation>,
    light_dir: Option<WebGlUniformLocation>,
    ambient: Option<WebGlUniformLocation>,
    lit: Option<WebGlUniformLocation>,
}

struct PanelProgram {
    program: WebGlProgram,
    view_proj: Option<WebGlUniformLocation>,
    model: Option<WebGlUniformLocation>,
    texture: Option<WebGlUniformLocation>,
    tint: Option<WebGlUniformLocation>,
    emissive: Option<WebGlUniformLocation>,
}

/// A viewport into the current framebuffer with its camera.
pub struct ViewTarget {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub view_proj: Mat4,
}

pub struct GlRenderer {
    gl: Gl,
    solid: SolidProgram,
    panel: PanelProgram,
    panel_mesh: GpuMesh,
    quad_mesh: GpuMesh,
    cube_mesh: GpuMesh,
    line_mesh: GpuMesh,
    controller_models: Vec<(ControllerId, GpuMesh)>,
    panel_texture: WebGlTexture,
    clear_color: Vec3,
    light_dir: Vec3,
    ambient: Vec3,
}

impl GlRenderer {
    pub fn new(gl: Gl, config: &SceneConfig) -> anyhow::Result<Self> {
        let solid_program = helpers::link_program(&gl, SCENE_VERT, SOLID_FRAG)?;
        let solid = SolidProgram {
            view_proj: helpers::uniform(&gl, &solid_program, "u_view_proj"),
            model: helpers::uniform(&gl, &solid_program, "u_model"),
            color: helpers::uniform(&gl, &solid_program, "u_color"),
            emissive: helpers::uniform(&gl, &solid_program, "u_emissive"),
            light_dir: helpers::uniform(&gl, &solid_program, "u_light_dir"),
            ambient: helpers::uniform(&gl, &solid_program, "u_ambient"),
            lit: helpers::uniform(&gl, &solid_program, "u_lit"),
            program: solid_program,
        };
        let panel_program = helpers::link_program(&gl, SCENE_VERT, PANEL_FRAG)?;
        let panel = PanelProgram {
            view_proj: helpers::uniform(&gl, &panel_program, "u_view_proj"),
            model: helpers::uniform(&gl, &panel_program, "u_model"),
            texture: helpers::uniform(&gl, &panel_program, "u_texture"),
            tint: helpers::uniform(&gl, &panel_program, "u_tint"),
            emissive: helpers::uniform(&gl, &panel_program, "u_emissive"),
            program: panel_program,
        };

        let panel_mesh = helpers::upload_mesh(
            &gl,
            &MeshData::quad(config.panel_width, config.panel_height),
            Gl::TRIANGLES,
        )?;
        let quad_mesh = helpers::upload_mesh(&gl, &MeshData::quad(1.0, 1.0), Gl::TRIANGLES)?;
        let cube_mesh = helpers::upload_mesh(&gl, &MeshData::cuboid(Vec3::ONE), Gl::TRIANGLES)?;
        let line_mesh =
            helpers::upload_mesh(&gl, &MeshData::line(Vec3::ZERO, Vec3::NEG_Z), Gl::LINES)?;

        let panel_texture = gl
            .create_texture()
            .ok_or_else(|| anyhow::anyhow!("create_texture failed"))?;
        gl.bind_texture(Gl::TEXTURE_2D, Some(&panel_texture));
        gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MIN_FILTER, Gl::LINEAR as i32);
        gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MAG_FILTER, Gl::LINEAR as i32);
        gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_S, Gl::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_T, Gl::CLAMP_TO_EDGE as i32);

        Ok(Self {
            gl,
            solid,
            panel,
            panel_mesh,
            quad_mesh,
            cube_mesh,
            line_mesh,
            controller_models: Vec::new(),
            panel_texture,
            clear_color: config.background,
            light_dir: config.light_direction.normalize_or_zero(),
            ambient: config.ambient,
        })
    }

    pub fn gl(&self) -> &Gl {
        &self.gl
    }

    pub fn has_controller_model(&self, id: ControllerId) -> bool {
        self.controller_models.iter().any(|(i, _)| *i == id)
    }

    pub fn set_controller_model(&mut self, id: ControllerId, model: &ControllerModel) -> anyhow::Result<()> {
        let mesh = helpers::upload_mesh(&self.gl, &model.mesh, Gl::TRIANGLES)?;
        self.controller_models.retain(|(i, _)| *i != id);
        self.controller_models.push((id, mesh));
        Ok(())
    }

    /// Re-upload the panel texture if the buffer changed since the last upload.
    pub fn sync_panel(&self, buffer: &mut PixelBuffer) {
        if !buffer.take_dirty() {
            return;
        }
        let gl = &self.gl;
        gl.bind_texture(Gl::TEXTURE_2D, Some(&self.panel_texture));
        gl.pixel_storei(Gl::UNPACK_ALIGNMENT, 1);
        if let Err(e) = gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            Gl::TEXTURE_2D,
            0,
            Gl::RGBA as i32,
            buffer.width() as i32,
            buffer.height() as i32,
            0,
            Gl::RGBA,
            Gl::UNSIGNED_BYTE,
            Some(buffer.as_bytes()),
        ) {
            log::error!("[gl] panel upload failed: {:?}", e);
        }
    }

    /// Bind `framebuffer` (None = default canvas) and clear it.
    pub fn begin_frame(&self, framebuffer: Option<&WebGlFramebuffer>, width: i32, height: i32) {
        let gl = &self.gl;
        gl.bind_framebuffer(Gl::FRAMEBUFFER, framebuffer);
        gl.viewport(0, 0, width, height);
        gl.clear_color(self.clear_color.x, self.clear_color.y, self.clear_color.z, 1.0);
        gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
        gl.enable(Gl::DEPTH_TEST);
        gl.disable(Gl::CULL_FACE);
        gl.enable(Gl::BLEND);
        gl.blend_func(Gl::SRC_ALPHA, Gl::ONE_MINUS_SRC_ALPHA);
    }

    pub fn draw(&self, view: &ViewTarget, items: &[DrawItem]) {
        let gl = &self.gl;
        gl.viewport(view.x, view.y, view.width, view.height);
        let view_proj = view.view_proj.to_cols_array();

        for item in items {
            let Some(mesh) = self.mesh_for(item.mesh) else {
                continue;
            };
            let model = item.model.to_cols_array();
            match item.pass {
                Pass::Panel => {
                    let p = &self.panel;
                    gl.use_program(Some(&p.program));
                    gl.uniform_matrix4fv_with_f32_array(p.view_proj.as_ref(), false, &view_proj);
                    gl.uniform_matrix4fv_with_f32_array(p.model.as_ref(), false, &model);
                    gl.active_texture(Gl::TEXTURE0);
                    gl.bind_texture(Gl::TEXTURE_2D, Some(&self.panel_texture));
                    gl.uniform1i(p.texture.as_ref(), 0);
                    gl.uniform3fv_with_f32_array(p.tint.as_ref(), &item.color.truncate().to_array());
                    gl.uniform3fv_with_f32_array(p.emissive.as_ref(), &item.emissive.to_array());
                }
                Pass::Solid | Pass::Line => {
                    let s = &self.solid;
                    gl.use_program(Some(&s.program));
                    gl.uniform_matrix4fv_with_f32_array(s.view_proj.as_ref(), false, &view_proj);
                    gl.uniform_matrix4fv_with_f32_array(s.model.as_ref(), false, &model);
                    gl.uniform4fv_with_f32_array(s.color.as_ref(), &item.color.to_array());
                    gl.uniform3fv_with_f32_array(s.emissive.as_ref(), &item.emissive.to_array());
                    gl.uniform3fv_with_f32_array(s.light_dir.as_ref(), &self.light_dir.to_array());
                    gl.uniform3fv_with_f32_array(s.ambient.as_ref(), &self.ambient.to_array());
                    gl.uniform1f(s.lit.as_ref(), if item.lit { 1.0 } else { 0.0 });
                }
            }
            gl.bind_vertex_array(Some(&mesh.vao));
            gl.draw_elements_with_i32(mesh.mode, mesh.index_count, Gl::UNSIGNED_SHORT, 0);
        }
        gl.bind_vertex_array(None);
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
}
