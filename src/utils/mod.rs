pub mod department_cache;
