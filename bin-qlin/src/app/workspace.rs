use indexmap::IndexMap;
use itertools::Itertools;
use qlin_matrix::MatType;
use qlin_matrix::dense::{Mat, Vector};
use crate::app::err::*;
use super::utils::is_valid_name;

/// A stored entity, borrowed from the workspace.
#[derive(Clone, Copy, Debug)]
pub enum Entry<'a> { 
    Mat(&'a Mat),
    Vec(&'a Vector),
}

/// Named matrices and vectors, kept in insertion order.
/// A name refers to at most one entity of either kind.
#[derive(Clone, Debug, Default)]
pub struct Workspace { 
    mats: IndexMap<String, Mat>,
    vecs: IndexMap<String, Vector>,
}

impl Workspace { 
    pub fn is_empty(&self) -> bool { 
        self.mats.is_empty() && self.vecs.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool { 
        self.mats.contains_key(name) || self.vecs.contains_key(name)
    }

    pub fn check_new_name(&self, name: &str) -> Result<(), Box<dyn std::error::Error>> { 
        ensure!(is_valid_name(name), InvalidName(name.to_string()));
        ensure!(!self.contains(name), Exists(name.to_string()));
        Ok(())
    }

    pub fn insert_mat(&mut self, name: &str, a: Mat) -> Result<(), Box<dyn std::error::Error>> { 
        self.check_new_name(name)?;
        self.mats.insert(name.to_string(), a);
        Ok(())
    }

    pub fn insert_vec(&mut self, name: &str, v: Vector) -> Result<(), Box<dyn std::error::Error>> { 
        self.check_new_name(name)?;
        self.vecs.insert(name.to_string(), v);
        Ok(())
    }

    pub fn mat(&self, name: &str) -> Result<&Mat, Box<dyn std::error::Error>> { 
        match self.mats.get(name) { 
            Some(a) => Ok(a),
            None => err!(NotFound { kind: Kind::Matrix, name: name.to_string() })
        }
    }

    pub fn vec(&self, name: &str) -> Result<&Vector, Box<dyn std::error::Error>> { 
        match self.vecs.get(name) { 
            Some(v) => Ok(v),
            None => err!(NotFound { kind: Kind::Vector, name: name.to_string() })
        }
    }

    /// Matrices are searched first.
    pub fn get(&self, name: &str) -> Option<Entry<'_>> { 
        self.mats.get(name).map(Entry::Mat).or_else(|| 
            self.vecs.get(name).map(Entry::Vec)
        )
    }

    /// Removes `name`, returning the kind of the removed entity.
    pub fn remove(&mut self, name: &str) -> Result<&'static str, Box<dyn std::error::Error>> { 
        if self.mats.shift_remove(name).is_some() { 
            Ok("matrix")
        } else if self.vecs.shift_remove(name).is_some() { 
            Ok("vector")
        } else { 
            err!(NotFound { kind: Kind::Any, name: name.to_string() })
        }
    }

    /// One line per entity: matrices with their shape, then vectors 
    /// with their size and components.
    pub fn listing(&self) -> String { 
        if self.is_empty() { 
            return "workspace is empty.".to_string()
        }

        let mats = self.mats.iter().map(|(name, a)| { 
            let (m, n) = a.shape();
            format!("[matrix] {name} ({m}x{n})")
        });
        let vecs = self.vecs.iter().map(|(name, v)| 
            format!("[vector] {name} (size {}) {v}", v.size())
        );

        mats.chain(vecs).join("\n")
    }
}
