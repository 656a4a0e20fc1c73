use crate::math::Vec3;

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Index order of the faces inside [Cubemap], matching the on-disk names.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Face {
    Right = 0,
    Left = 1,
    Top = 2,
    Bottom = 3,
    Front = 4,
    Back = 5,
}

pub const FACE_NAMES: [&str; 6] = ["right", "left", "top", "bottom", "front", "back"];

const FACE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// One decoded face: raw 8-bit RGB pixels, row-major.
#[derive(Clone, Debug)]
pub struct FaceImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl FaceImage {
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> FaceImage {
        assert!(pixels.len() == width * height * 3);
        FaceImage {
            width,
            height,
            pixels,
        }
    }

    /// Single-colour face, mostly useful for tests and benchmarks.
    pub fn solid(width: usize, height: usize, rgb: [u8; 3]) -> FaceImage {
        let mut pixels = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            pixels.extend_from_slice(&rgb);
        }
        FaceImage::new(width, height, pixels)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn texel(&self, x: usize, y: usize) -> [u8; 3] {
        let index = (y * self.width + x) * 3;
        [
            self.pixels[index],
            self.pixels[index + 1],
            self.pixels[index + 2],
        ]
    }
}

#[derive(Error, Debug)]
pub enum CubemapError {
    #[error("no image for cubemap face '{face}' in {}", directory.display())]
    MissingFace { face: String, directory: PathBuf },

    #[error("could not decode cubemap face {}", path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("cubemap face {} does not match the dimensions of the other faces", path.display())]
    MismatchedFace { path: PathBuf },
}

/// Environment light stored as six square textures on the faces of a cube.
///
/// This is the source of radiance for every ray that escapes the scene.
pub struct Cubemap {
    faces: [FaceImage; 6],
}

impl Cubemap {
    /// Build a cubemap from six equally sized faces, in [FACE_NAMES] order.
    pub fn from_faces(faces: [FaceImage; 6]) -> Cubemap {
        let width = faces[0].width;
        let height = faces[0].height;
        assert!(faces
            .iter()
            .all(|face| face.width == width && face.height == height));
        Cubemap { faces }
    }

    /// A cubemap with one solid colour per face.
    pub fn solid_faces(size: usize, colours: [[u8; 3]; 6]) -> Cubemap {
        let faces = [
            FaceImage::solid(size, size, colours[0]),
            FaceImage::solid(size, size, colours[1]),
            FaceImage::solid(size, size, colours[2]),
            FaceImage::solid(size, size, colours[3]),
            FaceImage::solid(size, size, colours[4]),
            FaceImage::solid(size, size, colours[5]),
        ];
        Cubemap::from_faces(faces)
    }

    /// Load the six faces named `right`, `left`, `top`, `bottom`, `front`,
    /// `back` (JPEG or PNG) from `directory`.
    pub fn load(directory: &Path) -> Result<Cubemap, CubemapError> {
        let mut faces: Vec<FaceImage> = Vec::with_capacity(6);
        for name in FACE_NAMES.iter() {
            let path = FACE_EXTENSIONS
                .iter()
                .map(|extension| directory.join(format!("{}.{}", name, extension)))
                .find(|candidate| candidate.is_file())
                .ok_or_else(|| CubemapError::MissingFace {
                    face: (*name).to_string(),
                    directory: directory.to_path_buf(),
                })?;
            let decoded = image::open(&path)
                .map_err(|source| CubemapError::Decode {
                    path: path.clone(),
                    source,
                })?
                .to_rgb();
            let face = FaceImage::new(
                decoded.width() as usize,
                decoded.height() as usize,
                decoded.into_raw(),
            );
            if let Some(first) = faces.first() {
                if face.width != first.width || face.height != first.height {
                    return Err(CubemapError::MismatchedFace { path });
                }
            }
            faces.push(face);
        }
        let faces = [
            faces[0].clone(),
            faces[1].clone(),
            faces[2].clone(),
            faces[3].clone(),
            faces[4].clone(),
            faces[5].clone(),
        ];
        Ok(Cubemap::from_faces(faces))
    }

    /// Face selection and face-local coordinates for a direction.
    ///
    /// The dominant axis picks the face; the remaining two components,
    /// divided by the dominant magnitude, give u and v in [-1, 1].
    fn face_uv(direction: &Vec3) -> (Face, f32, f32) {
        let x = direction.x();
        let y = direction.y();
        let z = direction.z();
        let ax = x.abs();
        let ay = y.abs();
        let az = z.abs();
        if ax >= ay && ax >= az {
            if x > 0.0 {
                (Face::Right, -z / ax, -y / ax)
            } else {
                (Face::Left, z / ax, -y / ax)
            }
        } else if ay >= az {
            if y > 0.0 {
                (Face::Top, x / ay, z / ay)
            } else {
                (Face::Bottom, x / ay, -z / ay)
            }
        } else if z > 0.0 {
            (Face::Front, x / az, -y / az)
        } else {
            (Face::Back, -x / az, -y / az)
        }
    }

    /// Linear RGB for the environment in the given direction,
    /// nearest-pixel filtered.
    pub fn sample(&self, direction: &Vec3) -> Vec3 {
        let (face, u, v) = Self::face_uv(direction);
        let face = &self.faces[face as usize];
        let u = (u * 0.5 + 0.5).max(0.0).min(1.0);
        let v = (v * 0.5 + 0.5).max(0.0).min(1.0);
        let x = (u * (face.width - 1) as f32).round() as usize;
        let y = (v * (face.height - 1) as f32).round() as usize;
        let texel = face.texel(x.min(face.width - 1), y.min(face.height - 1));
        Vec3::new(
            f32::from(texel[0]) / 255.0,
            f32::from(texel[1]) / 255.0,
            f32::from(texel[2]) / 255.0,
        )
    }
}
