mod aggregation_properties_tests;
