use itertools::Itertools;
use log::info;
use qlin_matrix::MatType;
use qlin_matrix::dense::{Mat, Solution, Vector};
use crate::app::err::*;
use super::utils::*;
use super::workspace::{Entry, Workspace};

type CmdResult = Result<Reply, Box<dyn std::error::Error>>;

pub const HELP: &str = "\
commands:
  mat NAME R C a11 a12 ...    define an R x C matrix (entries: N or N/D)
  vec NAME c1 c2 ...          define a vector
  ls                          list the workspace
  show NAME                   print a matrix or vector
  rm NAME                     remove a matrix or vector
  madd A B | mmul A B         A + B | A * B
  mvec A v                    A * v
  trans A | inv A             transpose | inverse
  det A | rank A | trace A
  rref A                      reduced row-echelon form and its operations
  solve A b                   solve A x = b
  colbasis A | rowbasis A     basis of the column | row space
  vadd u v | vsub u v         u + v | u - v
  vscale v r                  r * v
  dot u v | cross u v
  mag v | norm v | orth u v   magnitude | unit vector | orthogonality
  help | quit
append `as NAME` to save a resulting matrix or vector.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply { 
    Empty,
    Text(String),
    Quit,
}

impl Reply { 
    fn text<S: ToString>(s: S) -> Self { 
        Reply::Text(s.to_string())
    }
}

/// Parses and runs commands against a [`Workspace`].
#[derive(Debug, Default)]
pub struct Session { 
    ws: Workspace
}

impl Session { 
    pub fn new() -> Self { 
        Self::default()
    }

    #[cfg(test)]
    pub fn workspace(&self) -> &Workspace { 
        &self.ws
    }

    pub fn exec(&mut self, line: &str) -> CmdResult { 
        let line = match line.find('#') { 
            Some(i) => &line[..i],
            None => line
        };

        let mut tokens = line.split_whitespace().collect_vec();
        if tokens.is_empty() { 
            return Ok(Reply::Empty)
        }

        info!("exec: {}", tokens.join(" "));

        let save_as = match tokens.len() { 
            l if l >= 3 && tokens[l - 2] == "as" => { 
                let name = tokens.pop();
                tokens.pop();
                name
            },
            _ => None
        };

        let (&cmd, args) = tokens.split_first().ok_or("missing command")?;

        let saves = matches!(cmd, 
            "madd" | "mmul" | "mvec" | "trans" | "inv" | "rref" | "solve" | 
            "colbasis" | "rowbasis" | "vadd" | "vsub" | "vscale" | "cross" | "norm"
        );
        ensure!(saves || save_as.is_none(), NotSavable(cmd.to_string()));

        match cmd { 
            "mat"   => self.def_mat(args),
            "vec"   => self.def_vec(args),
            "ls"    => self.ls(args),
            "show"  => self.show(args),
            "rm"    => self.rm(args),
            "help"  => Ok(Reply::text(HELP)),
            "quit" | "exit" => Ok(Reply::Quit),

            "madd" | "mmul" | "trans" | "inv" => self.mat_op(cmd, args, save_as),
            "det" | "rank" | "trace" => self.mat_scalar(cmd, args),
            "mvec"  => self.mvec(args, save_as),
            "rref"  => self.rref(args, save_as),
            "solve" => self.solve(args, save_as),
            "colbasis" | "rowbasis" => self.basis(cmd, args, save_as),

            "vadd" | "vsub" | "vscale" | "cross" | "norm" => self.vec_op(cmd, args, save_as),
            "dot" | "mag" | "orth" => self.vec_query(cmd, args),

            _ => err!(UnknownCommand(cmd.to_string()))
        }
    }

    fn def_mat(&mut self, args: &[&str]) -> CmdResult { 
        ensure!(args.len() >= 3, Usage("mat NAME R C a11 a12 ...".into()));

        let name = args[0];
        let (m, n) = (parse_size(args[1])?, parse_size(args[2])?);
        let data = &args[3..];

        ensure!(data.len() == m * n, EntryCount { rows: m, cols: n, found: data.len() });
        self.ws.check_new_name(name)?;

        let data: Vec<_> = data.iter().map(|s| parse_rational(s)).try_collect()?;
        let a = Mat::from_data((m, n), data)?;

        self.ws.insert_mat(name, a)?;
        Ok(Reply::text(format!("saved matrix {name} ({m}x{n}).")))
    }

    fn def_vec(&mut self, args: &[&str]) -> CmdResult { 
        ensure!(args.len() >= 2, Usage("vec NAME c1 c2 ...".into()));

        let name = args[0];
        self.ws.check_new_name(name)?;

        let comps: Vec<_> = args[1..].iter().map(|s| parse_rational(s)).try_collect()?;
        let v = Vector::new(comps)?;
        let size = v.size();

        self.ws.insert_vec(name, v)?;
        Ok(Reply::text(format!("saved vector {name} (size {size}).")))
    }

    fn ls(&self, args: &[&str]) -> CmdResult { 
        ensure!(args.is_empty(), Usage("ls".into()));
        Ok(Reply::text(self.ws.listing()))
    }

    fn show(&self, args: &[&str]) -> CmdResult { 
        let [name] = args else { 
            return err!(Usage("show NAME".into()))
        };
        match self.ws.get(name) { 
            Some(Entry::Mat(a)) => Ok(Reply::text(a.to_string().trim_end())),
            Some(Entry::Vec(v)) => Ok(Reply::text(v)),
            None => err!(NotFound { kind: Kind::Any, name: name.to_string() })
        }
    }

    fn rm(&mut self, args: &[&str]) -> CmdResult { 
        let [name] = args else { 
            return err!(Usage("rm NAME".into()))
        };
        let kind = self.ws.remove(name)?;
        Ok(Reply::text(format!("removed {kind} {name}.")))
    }

    fn mat_op(&mut self, cmd: &str, args: &[&str], save_as: Option<&str>) -> CmdResult { 
        let res = match (cmd, args) { 
            ("madd", [a, b]) => self.ws.mat(a)?.checked_add(self.ws.mat(b)?)?,
            ("mmul", [a, b]) => self.ws.mat(a)?.checked_mul(self.ws.mat(b)?)?,
            ("trans", [a])   => self.ws.mat(a)?.transpose(),
            ("inv", [a])     => self.ws.mat(a)?.inv()?,
            ("trans" | "inv", _) => return err!(Usage(format!("{cmd} A"))),
            _ => return err!(Usage(format!("{cmd} A B")))
        };
        self.emit_mat(res, save_as)
    }

    fn mat_scalar(&self, cmd: &str, args: &[&str]) -> CmdResult { 
        let [a] = args else { 
            return err!(Usage(format!("{cmd} A")))
        };
        let a = self.ws.mat(a)?;
        let text = match cmd { 
            "det"   => format!("det: {}", a.det()?),
            "trace" => format!("trace: {}", a.trace()?),
            _       => format!("rank: {}", a.rank()?),
        };
        Ok(Reply::text(text))
    }

    fn mvec(&mut self, args: &[&str], save_as: Option<&str>) -> CmdResult { 
        let [a, v] = args else { 
            return err!(Usage("mvec A v".into()))
        };
        let res = self.ws.mat(a)?.mul_vec(self.ws.vec(v)?)?;
        self.emit_vec(res, save_as)
    }

    fn rref(&mut self, args: &[&str], save_as: Option<&str>) -> CmdResult { 
        let [a] = args else { 
            return err!(Usage("rref A".into()))
        };

        let (res, log, _) = self.ws.mat(a)?.rref()?.destruct();
        let log = if log.is_empty() { 
            "(none)".to_string()
        } else { 
            log.to_string().trim_end().to_string()
        };

        let text = self.render_mat(res, save_as)?;
        Ok(Reply::text(format!("{text}\noperations:\n{log}")))
    }

    fn solve(&mut self, args: &[&str], save_as: Option<&str>) -> CmdResult { 
        let [a, b] = args else { 
            return err!(Usage("solve A b".into()))
        };

        match self.ws.mat(a)?.solve(self.ws.vec(b)?)? { 
            Solution::Unique(x) => self.emit_vec(x, save_as),
            Solution::Inconsistent => Ok(Reply::text(
                "no unique solution exists (inconsistent system)."
            )),
            Solution::Infinite { rank } => Ok(Reply::text(format!(
                "no unique solution exists (infinitely many solutions, rank {rank})."
            ))),
        }
    }

    fn basis(&mut self, cmd: &str, args: &[&str], save_as: Option<&str>) -> CmdResult { 
        let [a] = args else { 
            return err!(Usage(format!("{cmd} A")))
        };

        let a = self.ws.mat(a)?;
        let (kind, basis) = if cmd == "colbasis" { 
            ("column", a.col_basis()?)
        } else { 
            ("row", a.row_basis()?)
        };

        if basis.is_empty() { 
            return Ok(Reply::text("basis is empty (zero space)."))
        }

        let mut text = format!("{kind} space basis:\n{}", basis.iter().join("\n"));

        if let Some(name) = save_as { 
            let names = (1..=basis.len()).map(|i| format!("{name}{i}")).collect_vec();
            for n in names.iter() { 
                self.ws.check_new_name(n)?;
            }
            for (n, v) in names.iter().zip(basis) { 
                self.ws.insert_vec(n, v)?;
            }
            text += &format!("\nsaved as {}.", names.join(", "));
        }

        Ok(Reply::Text(text))
    }

    fn vec_op(&mut self, cmd: &str, args: &[&str], save_as: Option<&str>) -> CmdResult { 
        let res = match (cmd, args) { 
            ("vadd", [u, v])   => self.ws.vec(u)?.checked_add(self.ws.vec(v)?)?,
            ("vsub", [u, v])   => self.ws.vec(u)?.checked_sub(self.ws.vec(v)?)?,
            ("cross", [u, v])  => self.ws.vec(u)?.cross(self.ws.vec(v)?)?,
            ("vscale", [v, r]) => self.ws.vec(v)?.scale(&parse_rational(r)?)?,
            ("norm", [v])      => self.ws.vec(v)?.normalize()?,
            ("vscale", _) => return err!(Usage("vscale v r".into())),
            ("norm", _)   => return err!(Usage("norm v".into())),
            _ => return err!(Usage(format!("{cmd} u v")))
        };
        self.emit_vec(res, save_as)
    }

    fn vec_query(&self, cmd: &str, args: &[&str]) -> CmdResult { 
        let text = match (cmd, args) { 
            ("dot", [u, v])  => format!("dot: {}", self.ws.vec(u)?.dot(self.ws.vec(v)?)?),
            ("orth", [u, v]) => format!("orthogonal: {}", self.ws.vec(u)?.is_orthogonal(self.ws.vec(v)?)?),
            ("mag", [v])     => format!("magnitude: {}", self.ws.vec(v)?.magnitude()),
            ("mag", _) => return err!(Usage("mag v".into())),
            _ => return err!(Usage(format!("{cmd} u v")))
        };
        Ok(Reply::text(text))
    }

    fn emit_mat(&mut self, a: Mat, save_as: Option<&str>) -> CmdResult { 
        Ok(Reply::Text(self.render_mat(a, save_as)?))
    }

    fn render_mat(&mut self, a: Mat, save_as: Option<&str>) -> Result<String, Box<dyn std::error::Error>> { 
        let mut text = a.to_string().trim_end().to_string();
        if let Some(name) = save_as { 
            let (m, n) = a.shape();
            self.ws.insert_mat(name, a)?;
            text += &format!("\nsaved matrix {name} ({m}x{n}).");
        }
        Ok(text)
    }

    fn emit_vec(&mut self, v: Vector, save_as: Option<&str>) -> CmdResult { 
        let mut text = v.to_string();
        if let Some(name) = save_as { 
            self.ws.insert_vec(name, v)?;
            text += &format!("\nsaved vector {name}.");
        }
        Ok(Reply::Text(text))
    }
}

#[cfg(test)]
mod tests { 
    use qlin::Rational;
    use super::*;

    fn run(s: &mut Session, line: &str) -> String { 
        match s.exec(line) { 
            Ok(Reply::Text(t)) => t,
            Ok(r) => panic!("unexpected reply: {r:?}"),
            Err(e) => panic!("{line}: {e}")
        }
    }

    fn run_err(s: &mut Session, line: &str) -> String { 
        match s.exec(line) { 
            Err(e) => e.to_string(),
            Ok(r) => panic!("{line}: expected an error, got {r:?}")
        }
    }

    fn run_kind(s: &mut Session, line: &str) -> Error { 
        match s.exec(line) { 
            Err(e) => e.downcast_ref::<Error>().cloned().unwrap_or_else(|| panic!("{line}: {e}")),
            Ok(r) => panic!("{line}: expected an error, got {r:?}")
        }
    }

    #[test]
    fn blank_and_comments() { 
        let mut s = Session::new();
        assert_eq!(s.exec("").unwrap(), Reply::Empty);
        assert_eq!(s.exec("   ").unwrap(), Reply::Empty);
        assert_eq!(s.exec("# a comment").unwrap(), Reply::Empty);
        assert_eq!(s.exec("quit").unwrap(), Reply::Quit);
        assert_eq!(s.exec("exit # bye").unwrap(), Reply::Quit);
    }

    #[test]
    fn define() { 
        let mut s = Session::new();
        assert_eq!(run(&mut s, "mat A 2 2 1 2 3 4"), "saved matrix A (2x2).");
        assert_eq!(run(&mut s, "vec v 1/2 -3 0"), "saved vector v (size 3).");

        let a = s.workspace().mat("A").unwrap();
        assert_eq!(a, &Mat::from_data((2, 2), [1, 2, 3, 4]).unwrap());

        let v = s.workspace().vec("v").unwrap();
        assert_eq!(v[0], Rational::new(1, 2));
    }

    #[test]
    fn define_invalid() { 
        let mut s = Session::new();
        run(&mut s, "mat A 1 1 5");

        assert_eq!(run_err(&mut s, "mat A 1 1 5"), "'A' exists.");
        assert_eq!(run_err(&mut s, "vec A 1"), "'A' exists.");
        assert_eq!(run_err(&mut s, "mat B 2 2 1 2 3"), "expected 4 entries for a 2x2 matrix, got 3.");
        assert_eq!(run_err(&mut s, "mat B 0 2 1"), "invalid size: '0'.");
        assert_eq!(run_err(&mut s, "vec w 1/0"), "zero denominator");
        assert_eq!(run_err(&mut s, "vec w x"), "cannot parse 'x' as a fraction");
        assert!(s.workspace().get("B").is_none());
    }

    #[test]
    fn unknown() { 
        let mut s = Session::new();
        assert!(run_err(&mut s, "frobnicate A").starts_with("unknown command"));
        assert_eq!(run_err(&mut s, "det A"), "matrix 'A' not found.");
        assert_eq!(run_err(&mut s, "dot u v"), "vector 'u' not found.");
    }

    #[test]
    fn error_kinds() { 
        let mut s = Session::new();
        run(&mut s, "mat A 1 1 5");

        let not_found = |kind, name: &str| Error::NotFound { kind, name: name.into() };
        assert_eq!(run_kind(&mut s, "det B"), not_found(Kind::Matrix, "B"));
        assert_eq!(run_kind(&mut s, "norm A"), not_found(Kind::Vector, "A"));
        assert_eq!(run_kind(&mut s, "show x"), not_found(Kind::Any, "x"));
        assert_eq!(run_kind(&mut s, "vec A 1"), Error::Exists("A".into()));
        assert_eq!(run_kind(&mut s, "vec _a 1"), Error::InvalidName("_a".into()));
        assert_eq!(run_kind(&mut s, "rm"), Error::Usage("rm NAME".into()));
        assert_eq!(run_kind(&mut s, "madd A"), Error::Usage("madd A B".into()));
        assert_eq!(run_kind(&mut s, "foo"), Error::UnknownCommand("foo".into()));
        assert_eq!(run_kind(&mut s, "ls as x"), Error::NotSavable("ls".into()));
        assert_eq!(run_kind(&mut s, "mat B 1 2 1"), Error::EntryCount { rows: 1, cols: 2, found: 1 });

        // engine errors are not shell errors.
        let e = s.exec("mat C 1 2 1 2").and_then(|_| s.exec("det C")).unwrap_err();
        assert!(e.downcast_ref::<Error>().is_none());
        assert!(e.downcast_ref::<qlin_matrix::LinAlgError>().is_some());
    }

    #[test]
    fn overflow_reported() { 
        let mut s = Session::new();
        run(&mut s, "mat A 2 2 9223372036854775807 1 1 9223372036854775807");
        assert_eq!(run_err(&mut s, "det A"), "integer overflow in rational arithmetic");
        assert_eq!(run_err(&mut s, "rank A"), "integer overflow in rational arithmetic");
        assert_eq!(run_err(&mut s, "rref A as R"), "integer overflow in rational arithmetic");
        assert!(s.workspace().get("R").is_none());
    }

    #[test]
    fn save_refused() { 
        let mut s = Session::new();
        run(&mut s, "mat A 2 2 1 2 3 4");
        assert_eq!(run_err(&mut s, "det A as d"), "`det` has no result to save.");
    }

    #[test]
    fn mat_ops() { 
        let mut s = Session::new();
        run(&mut s, "mat A 2 2 1 2 3 4");
        run(&mut s, "mat B 2 2 1 0 0 1");

        run(&mut s, "madd A B as C");
        run(&mut s, "mmul A B as D");
        run(&mut s, "trans A as T");
        run(&mut s, "inv A as I");

        let ws = s.workspace();
        assert_eq!(ws.mat("C").unwrap(), &Mat::from_data((2, 2), [2, 2, 3, 5]).unwrap());
        assert_eq!(ws.mat("D").unwrap(), ws.mat("A").unwrap());
        assert_eq!(ws.mat("T").unwrap(), &Mat::from_data((2, 2), [1, 3, 2, 4]).unwrap());
        assert_eq!(
            ws.mat("I").unwrap(), 
            &Mat::from_data((2, 2), [(-2, 1), (1, 1), (3, 2), (-1, 2)]).unwrap()
        );
    }

    #[test]
    fn mat_scalars() { 
        let mut s = Session::new();
        run(&mut s, "mat A 2 2 1 2 3 4");
        run(&mut s, "mat O 2 2 1 1 1 1");
        run(&mut s, "mat R 2 3 1 2 3 4 5 6");

        assert_eq!(run(&mut s, "det A"), "det: -2/1");
        assert_eq!(run(&mut s, "trace A"), "trace: 5/1");
        assert_eq!(run(&mut s, "rank O"), "rank: 1");
        assert_eq!(run(&mut s, "det O"), "det: 0/1");
        assert_eq!(run_err(&mut s, "det R"), "matrix must be square, got 2x3");
        assert_eq!(run_err(&mut s, "inv O"), "matrix is singular");
    }

    #[test]
    fn rref() { 
        let mut s = Session::new();
        run(&mut s, "mat P 2 2 0 1 1 0");

        let out = run(&mut s, "rref P as Q");
        assert!(out.ends_with("operations:\nR1 <-> R0"), "{out}");
        assert!(s.workspace().mat("Q").unwrap().is_id());

        let out = run(&mut s, "rref Q");
        assert!(out.ends_with("operations:\n(none)"), "{out}");
    }

    #[test]
    fn solve() { 
        let mut s = Session::new();
        run(&mut s, "mat I 2 2 1 0 0 1");
        run(&mut s, "mat O 2 2 1 1 1 1");
        run(&mut s, "vec b 5 10");
        run(&mut s, "vec c 2 2");

        assert_eq!(run(&mut s, "solve I b as x"), "[5/1, 10/1]\nsaved vector x.");
        assert_eq!(run(&mut s, "solve O b"), "no unique solution exists (inconsistent system).");
        assert_eq!(run(&mut s, "solve O c"), "no unique solution exists (infinitely many solutions, rank 1).");
        assert_eq!(run(&mut s, "mvec I x"), "[5/1, 10/1]");
    }

    #[test]
    fn basis() { 
        let mut s = Session::new();
        run(&mut s, "mat A 3 3 1 2 3 2 4 6 1 0 1");
        run(&mut s, "mat Z 2 2 0 0 0 0");

        assert_eq!(
            run(&mut s, "colbasis A as c"), 
            "column space basis:\n[1/1, 2/1, 1/1]\n[2/1, 4/1, 0/1]\nsaved as c1, c2."
        );
        assert_eq!(
            run(&mut s, "rowbasis A"), 
            "row space basis:\n[1/1, 2/1, 3/1]\n[1/1, 0/1, 1/1]"
        );
        assert_eq!(run(&mut s, "colbasis Z"), "basis is empty (zero space).");

        assert!(s.workspace().vec("c2").is_ok());
        assert_eq!(run_err(&mut s, "colbasis A as c"), "'c1' exists.");
    }

    #[test]
    fn vec_ops() { 
        let mut s = Session::new();
        run(&mut s, "vec i 1 0 0");
        run(&mut s, "vec j 0 1 0");
        run(&mut s, "vec u 3 4");

        assert_eq!(run(&mut s, "cross i j"), "[0/1, 0/1, 1/1]");
        assert_eq!(run(&mut s, "vadd i j as w"), "[1/1, 1/1, 0/1]\nsaved vector w.");
        assert_eq!(run(&mut s, "vsub i j"), "[1/1, -1/1, 0/1]");
        assert_eq!(run(&mut s, "vscale w 1/2"), "[1/2, 1/2, 0/1]");
        assert_eq!(run(&mut s, "dot i w"), "dot: 1/1");
        assert_eq!(run(&mut s, "orth i j"), "orthogonal: true");
        assert_eq!(run(&mut s, "orth i w"), "orthogonal: false");
        assert_eq!(run(&mut s, "mag u"), "magnitude: 5");
        assert_eq!(run(&mut s, "norm u"), "[3/5, 4/5]");

        assert_eq!(run_err(&mut s, "cross u i"), "cross product requires 3-dimensional vectors, got size 2");
        assert_eq!(run_err(&mut s, "dot u i"), "size mismatch: 2 vs 3");
    }

    #[test]
    fn show_ls_rm() { 
        let mut s = Session::new();
        assert_eq!(run(&mut s, "ls"), "workspace is empty.");

        run(&mut s, "mat A 1 2 1 2");
        run(&mut s, "vec v 1 2");

        assert_eq!(run(&mut s, "show v"), "[1/1, 2/1]");
        assert!(run(&mut s, "show A").contains("1/1"));
        assert_eq!(run(&mut s, "ls"), "[matrix] A (1x2)\n[vector] v (size 2) [1/1, 2/1]");

        assert_eq!(run(&mut s, "rm A"), "removed matrix A.");
        assert_eq!(run(&mut s, "rm v"), "removed vector v.");
        assert_eq!(run_err(&mut s, "rm v"), "name 'v' not found.");
        assert_eq!(run_err(&mut s, "show v"), "name 'v' not found.");
    }
}
