use super::{ElemType, RuntimeVal, ValueError};

pub const MAX_ARRAY_SIZE: usize = 1_000_000;

// Fixed size array. All elements share the element type given at declaration
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayType {
    elem_type: ElemType,
    val: Vec<RuntimeVal>,
}

impl ArrayType {
    pub fn new(elem_type: ElemType, size: i64) -> Result<Self, ValueError> {
        if size < 0 {
            return Err(ValueError::NegativeArraySize(size));
        }
        if size as u64 > MAX_ARRAY_SIZE as u64 {
            return Err(ValueError::ArraySizeTooLarge(size, MAX_ARRAY_SIZE));
        }

        Ok(Self {
            elem_type,
            val: vec![elem_type.default_value(); size as usize],
        })
    }

    pub fn empty(elem_type: ElemType) -> Self {
        Self { elem_type, val: Vec::new() }
    }

    pub fn elem_type(&self) -> ElemType {
        self.elem_type
    }

    pub fn len(&self) -> usize {
        self.val.len()
    }

    pub fn is_empty(&self) -> bool {
        self.val.is_empty()
    }

    pub fn values(&self) -> &[RuntimeVal] {
        &self.val
    }

    pub fn get(&self, idx: i64) -> Result<RuntimeVal, ValueError> {
        let id = self.check_and_get_index(idx)?;

        Ok(self.val[id].clone())
    }

    // Int values are widened in a real array, anything else must match
    pub fn set(&mut self, idx: i64, value: RuntimeVal) -> Result<(), ValueError> {
        let id = self.check_and_get_index(idx)?;

        let value = match (self.elem_type, value) {
            (ElemType::Int, v @ RuntimeVal::Int(_)) => v,
            (ElemType::Real, v @ RuntimeVal::Real(_)) => v,
            (ElemType::Real, RuntimeVal::Int(i)) => RuntimeVal::Real(i as f64),
            (elem, v) => return Err(ValueError::WrongElemType(elem, v.get_type())),
        };

        self.val[id] = value;

        Ok(())
    }

    // No wrapping of negative indexes here, the language only counts from 0
    fn check_and_get_index(&self, idx: i64) -> Result<usize, ValueError> {
        if idx < 0 || idx as usize >= self.val.len() {
            return Err(ValueError::ArrayOverIndexing(idx, self.val.len()));
        }

        Ok(idx as usize)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_array_is_filled_with_defaults() {
        let arr = ArrayType::new(ElemType::Real, 3).unwrap();

        assert_eq!(arr.len(), 3);
        assert_eq!(arr.values().to_vec(), vec![RuntimeVal::Real(0.); 3]);
        assert!(matches!(
            ArrayType::new(ElemType::Int, -1),
            Err(ValueError::NegativeArraySize(-1))
        ));
    }

    #[test]
    fn size_is_bounded() {
        assert_eq!(
            ArrayType::new(ElemType::Int, 1 << 60),
            Err(ValueError::ArraySizeTooLarge(1 << 60, MAX_ARRAY_SIZE))
        );
        assert!(ArrayType::new(ElemType::Int, MAX_ARRAY_SIZE as i64 + 1).is_err());
        assert_eq!(ArrayType::new(ElemType::Int, 0).map(|a| a.len()), Ok(0));
    }

    #[test]
    fn set_and_get() {
        let mut arr = ArrayType::new(ElemType::Int, 5).unwrap();
        arr.set(2, RuntimeVal::Int(99)).unwrap();

        assert_eq!(arr.get(2), Ok(RuntimeVal::Int(99)));
        assert_eq!(arr.get(0), Ok(RuntimeVal::Int(0)));
    }

    #[test]
    fn out_of_bound_access() {
        let mut arr = ArrayType::new(ElemType::Int, 5).unwrap();

        assert_eq!(arr.get(5), Err(ValueError::ArrayOverIndexing(5, 5)));
        assert_eq!(arr.get(-1), Err(ValueError::ArrayOverIndexing(-1, 5)));
        assert_eq!(
            arr.set(5, RuntimeVal::Int(1)),
            Err(ValueError::ArrayOverIndexing(5, 5))
        );
    }

    #[test]
    fn element_types_never_mix() {
        let mut ints = ArrayType::new(ElemType::Int, 2).unwrap();
        let mut reals = ArrayType::new(ElemType::Real, 2).unwrap();

        assert!(matches!(
            ints.set(0, RuntimeVal::Real(1.5)),
            Err(ValueError::WrongElemType(ElemType::Int, _))
        ));
        assert!(ints.set(0, RuntimeVal::Bool(true)).is_err());

        reals.set(1, RuntimeVal::Int(4)).unwrap();
        assert_eq!(reals.get(1), Ok(RuntimeVal::Real(4.)));
    }
}
