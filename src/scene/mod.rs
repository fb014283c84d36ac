//! # Scene Module
//!
//! Minimal scene-graph types shared between the host and the controls
//! component: colors, vectors, named meshes and the loaded controller model.
//!
//! The host owns the loaded model. Meshes are handed out as [`MeshRef`]
//! (`Rc<RefCell<Mesh>>`) so the controls component can keep references to
//! individual buttons and mutate their material color or rotation in place
//! from host callbacks. Everything here is single-threaded.
//!
//! ## Usage
//!
//! ```
//! use vive_controls::scene::{Color, ControllerModel, Mesh};
//!
//! let model = ControllerModel::new()
//!     .with_mesh(Mesh::new("body").with_child(Mesh::new("trigger")));
//!
//! let trigger = model.object_by_name("trigger").expect("nested lookup");
//! trigger.borrow_mut().set_color("#22D1EE".parse::<Color>()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ViveControlsError;

/// Shared, mutable handle to a mesh inside a loaded model.
pub type MeshRef = Rc<RefCell<Mesh>>;

/// Shared handle to a whole loaded model, as delivered by the model loader.
pub type SharedModel = Rc<RefCell<ControllerModel>>;

/// 24-bit RGB material color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Creates a color from its components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Color {
    type Err = ViveControlsError;

    /// Parses `#RRGGBB` or the short `#RGB` form (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ViveControlsError::InvalidColor(s.to_string());

        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());

        match hex.len() {
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                // #abc expands to #aabbcc
                let expand = |i: usize| channel(&hex[i..=i]).map(|v| v * 0x11);
                Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ViveControlsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Three-component vector used for positions and Euler rotations (radians).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// All components zero.
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// A named node of a loaded model with a single material.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    name: String,
    /// Material color. `None` until something sets it.
    pub color: Option<Color>,
    /// Euler rotation in radians.
    pub rotation: Vec3,
    pub position: Vec3,
    children: Vec<MeshRef>,
}

impl Mesh {
    /// Creates an untransformed mesh with no material color.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
            rotation: Vec3::ZERO,
            position: Vec3::ZERO,
            children: Vec::new(),
        }
    }

    /// Adds a child mesh (builder style).
    #[must_use]
    pub fn with_child(mut self, child: Mesh) -> Self {
        self.children.push(Rc::new(RefCell::new(child)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[MeshRef] {
        &self.children
    }

    /// Sets the material color.
    pub fn set_color(&mut self, color: Color) {
        self.color = Some(color);
    }
}

/// Root object of a loaded controller model.
///
/// Supports name-based lookup of any mesh in the subtree and exposes the root
/// position so pivot corrections can be applied after loading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerModel {
    pub position: Vec3,
    meshes: Vec<MeshRef>,
}

impl ControllerModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a top-level mesh (builder style).
    #[must_use]
    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.add_mesh(mesh);
        self
    }

    /// Adds a top-level mesh and returns a handle to it.
    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshRef {
        let mesh = Rc::new(RefCell::new(mesh));
        self.meshes.push(Rc::clone(&mesh));
        mesh
    }

    /// Wraps the model into the shared handle the model loader hands out.
    #[must_use]
    pub fn into_shared(self) -> SharedModel {
        Rc::new(RefCell::new(self))
    }

    /// Finds the first mesh called `name`, searching depth-first.
    pub fn object_by_name(&self, name: &str) -> Option<MeshRef> {
        self.meshes.iter().find_map(|mesh| find_in(mesh, name))
    }
}

fn find_in(mesh: &MeshRef, name: &str) -> Option<MeshRef> {
    let node = mesh.borrow();
    if node.name == name {
        return Some(Rc::clone(mesh));
    }
    node.children.iter().find_map(|child| find_in(child, name))
}
