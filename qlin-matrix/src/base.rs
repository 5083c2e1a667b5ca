pub trait MatType {
    fn shape(&self) -> (usize, usize);
    fn rows(&self) -> usize { self.shape().0 }
    fn cols(&self) -> usize { self.shape().1 }
    fn is_square(&self) -> bool { 
        let (m, n) = self.shape();
        m == n
    }
}
