use crate::printer::PrinterExt;

/// Address-ordered symbol table.
#[derive(Clone, Default, Debug)]
pub struct Symbols {
    sorted: bool,
    list: Vec<(u64, String)>,
}

impl Symbols {
    pub fn push<S: Into<String>>(&mut self, address: u64, name: S) {
        self.sorted = false;
        self.list.push((address, name.into()));
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn first_address(&self) -> Option<u64> {
        self.list.iter().map(|(addr, _)| *addr).min()
    }

    pub fn as_info(&mut self) -> SymbolsInfo {
        if !self.sorted {
            self.list.sort_by_key(|(addr, _)| *addr);
            self.sorted = true;
        }
        SymbolsInfo { list: &self.list }
    }
}

impl<S: Into<String>> FromIterator<(u64, S)> for Symbols {
    fn from_iter<I: IntoIterator<Item = (u64, S)>>(iter: I) -> Self {
        let mut symbols = Symbols::default();
        for (address, name) in iter {
            symbols.push(address, name);
        }
        symbols
    }
}

/// Sorted view used for lookups while printing.
pub struct SymbolsInfo<'a> {
    list: &'a [(u64, String)],
}

impl PrinterExt for SymbolsInfo<'_> {
    fn get_symbol(&self, address: u64) -> Option<(u64, &str)> {
        let index = match self.list.binary_search_by_key(&address, |(addr, _)| *addr) {
            Ok(index) => index,
            Err(index) => index.checked_sub(1)?,
        };
        self.list
            .get(index)
            .map(|(addr, name)| (*addr, name.as_str()))
    }

    fn get_symbol_after(&self, address: u64) -> Option<(u64, &str)> {
        let index = self.list.partition_point(|(addr, _)| *addr <= address);
        self.list
            .get(index)
            .map(|(addr, name)| (*addr, name.as_str()))
    }
}
