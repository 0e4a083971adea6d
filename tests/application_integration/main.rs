mod translation_negative_cache_test;
