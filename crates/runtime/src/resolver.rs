use crate::commands::CommandError;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum BlockKind {
    If,
    While,
    For,
    Method,
}

impl BlockKind {
    pub fn start_keyword(&self) -> &'static str {
        match self {
            BlockKind::If => "if",
            BlockKind::While => "while",
            BlockKind::For => "for",
            BlockKind::Method => "method",
        }
    }

    pub fn end_keyword(&self) -> &'static str {
        match self {
            BlockKind::If => "end-if",
            BlockKind::While => "end-while",
            BlockKind::For => "end-for",
            BlockKind::Method => "end-method",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BlockRole {
    Start,
    Middle,
    End,
}

// Anything that may open, split or close a block
pub trait BlockMarker {
    fn block_role(&self) -> Option<(BlockKind, BlockRole)>;
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct BlockMatch {
    pub middle: Option<usize>,
    pub end: usize,
}

// From a block start, finds its end. Blocks of the same kind nest, other
// kinds are ignored. The first middle marker at depth zero is kept
pub fn find_block_end<T: BlockMarker>(
    items: &[T],
    from: usize,
    kind: BlockKind,
) -> Result<BlockMatch, CommandError> {
    let mut depth = 0usize;
    let mut middle = None;

    for (idx, item) in items.iter().enumerate().skip(from + 1) {
        match item.block_role() {
            Some((k, BlockRole::Start)) if k == kind => depth += 1,
            Some((k, BlockRole::Middle)) if k == kind && depth == 0 => {
                middle.get_or_insert(idx);
            }
            Some((k, BlockRole::End)) if k == kind => {
                if depth == 0 {
                    return Ok(BlockMatch { middle, end: idx });
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    Err(CommandError::MissingBlockTerminator {
        searched: kind.end_keyword(),
        from: kind.start_keyword(),
        position: from,
    })
}

// Same scan backwards, from a block end to its start
pub fn find_block_start<T: BlockMarker>(
    items: &[T],
    from: usize,
    kind: BlockKind,
) -> Result<usize, CommandError> {
    let mut depth = 0usize;

    for idx in (0..from.min(items.len())).rev() {
        match items[idx].block_role() {
            Some((k, BlockRole::End)) if k == kind => depth += 1,
            Some((k, BlockRole::Start)) if k == kind => {
                if depth == 0 {
                    return Ok(idx);
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    Err(CommandError::MissingBlockTerminator {
        searched: kind.start_keyword(),
        from: kind.end_keyword(),
        position: from,
    })
}
