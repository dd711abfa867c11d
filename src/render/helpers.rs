use web_sys::{WebGl2RenderingContext as Gl, WebGlProgram, WebGlShader, WebGlUniformLocation};
use xr_core::mesh::MeshData;

use super::GpuMesh;

pub fn compile_shader(gl: &Gl, kind: u32, source: &str) -> anyhow::Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| anyhow::anyhow!("create_shader failed"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    let ok = gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(anyhow::anyhow!("shader compile error: {}", log))
    }
}

pub fn link_program(gl: &Gl, vert_src: &str, frag_src: &str) -> anyhow::Result<WebGlProgram> {
    let vert = compile_shader(gl, Gl::VERTEX_SHADER, vert_src)?;
    let frag = compile_shader(gl, Gl::FRAGMENT_SHADER, frag_src)?;
    let program = gl
        .create_program()
        .ok_or_else(|| anyhow::anyhow!("create_program failed"))?;
    gl.attach_shader(&program, &vert);
    gl.attach_shader(&program, &frag);
    gl.link_program(&program);
    // shaders are owned by the program once linked
    gl.delete_shader(Some(&vert));
    gl.delete_shader(Some(&frag));
    let ok = gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        Err(anyhow::anyhow!("program link error: {}", log))
    }
}

#[inline]
pub fn uniform(gl: &Gl, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
    let loc = gl.get_uniform_location(program, name);
    if loc.is_none() {
        log::warn!("[gl] uniform {} not found", name);
    }
    loc
}

/// Upload an interleaved mesh into a fresh VAO (position, normal, uv at locations 0..=2).
pub fn upload_mesh(gl: &Gl, mesh: &MeshData, mode: u32) -> anyhow::Result<GpuMesh> {
    let vao = gl
        .create_vertex_array()
        .ok_or_else(|| anyhow::anyhow!("create_vertex_array failed"))?;
    gl.bind_vertex_array(Some(&vao));

    let vbo = gl
        .create_buffer()
        .ok_or_else(|| anyhow::anyhow!("create_buffer failed"))?;
    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&vbo));
    let vertices = mesh.interleaved();
    gl.buffer_data_with_u8_array(Gl::ARRAY_BUFFER, bytemuck::cast_slice(&vertices), Gl::STATIC_DRAW);

    let stride = std::mem::size_of::<xr_core::mesh::Vertex>() as i32;
    gl.enable_vertex_attrib_array(0);
    gl.vertex_attrib_pointer_with_i32(0, 3, Gl::FLOAT, false, stride, 0);
    gl.enable_vertex_attrib_array(1);
    gl.vertex_attrib_pointer_with_i32(1, 3, Gl::FLOAT, false, stride, 12);
    gl.enable_vertex_attrib_array(2);
    gl.vertex_attrib_pointer_with_i32(2, 2, Gl::FLOAT, false, stride, 24);

    let ibo = gl
        .create_buffer()
        .ok_or_else(|| anyhow::anyhow!("create_buffer failed"))?;
    gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&ibo));
    gl.buffer_data_with_u8_array(
        Gl::ELEMENT_ARRAY_BUFFER,
        bytemuck::cast_slice(&mesh.indices),
        Gl::STATIC_DRAW,
    );

    gl.bind_vertex_array(None);
    Ok(GpuMesh {
        vao,
        index_count: mesh.indices.len() as i32,
        mode,
    })
}
